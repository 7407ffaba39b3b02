//! Rendering layers.
//!
//! Edges are drawn beneath nodes so that clipped edge ends tuck under the
//! node outlines; the hit-test overlay sits above the visible edge and the
//! labels above both.

/// Defines the rendering layers of a diagram, bottom to top.
///
/// The `Ord` derive uses declaration order, so the first variant renders
/// first (bottom) and the last variant renders last (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Marker definitions (`<defs>`), never visible on their own
    Definitions,
    /// Visible edge lines
    Edge,
    /// Wider transparent copies of edges used for hit testing
    EdgeHover,
    /// Edge labels laid along the edge path
    EdgeLabel,
    /// Node groups (circle plus label)
    Node,
}

impl RenderLayer {
    /// Returns the CSS class used for elements on this layer.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Definitions => "defs",
            Self::Edge => "edge",
            Self::EdgeHover => "edge-hover",
            Self::EdgeLabel => "edge-label",
            Self::Node => "node",
        }
    }
}
