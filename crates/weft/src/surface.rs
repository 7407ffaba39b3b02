//! Rendering surface contract.
//!
//! A [`RenderSurface`] holds keyed visual elements. The core tells it which
//! elements exist ([`RenderSurface::create`], [`RenderSurface::update`],
//! [`RenderSurface::remove`]) during a sync cycle, and where they go
//! ([`RenderSurface::place`]) every time geometry is drawn.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use weft_core::{
    draw::MarkerDefinition,
    geometry::{Point, Segment, Size, Transform},
    identifier::Key,
};

use crate::path::LabelOrientation;

/// Stroke of the invisible hit-test copy drawn over every edge.
pub const HOVER_STROKE: &str = "green";
pub const HOVER_STROKE_WIDTH: f32 = 10.0;

/// The kinds of keyed elements a surface manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node,
    Edge,
    /// Wide transparent copy of an edge, used for hit testing.
    EdgeHover,
    EdgeLabel,
    Marker,
}

impl ElementKind {
    /// Kinds synchronized on every cycle, in creation order.
    pub const SYNCED: [ElementKind; 4] = [
        ElementKind::Node,
        ElementKind::Edge,
        ElementKind::EdgeHover,
        ElementKind::EdgeLabel,
    ];
}

/// A keyed element on the surface.
///
/// Identity is the element kind plus the record key. The document id is
/// derived from the key for display and references only, so two keys that
/// sanitize to the same id (`"a b"` and `"a-b"`) stay distinct elements.
#[derive(Debug, Clone)]
pub struct ElementId {
    kind: ElementKind,
    key: Key,
    dom_id: String,
}

impl ElementId {
    pub fn node(key: Key) -> Self {
        Self {
            kind: ElementKind::Node,
            key,
            dom_id: format!("node-{}", key.dom_safe()),
        }
    }

    /// `edge-<key>`, with every character outside `[A-Za-z0-9_-]` replaced
    /// by `-`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use weft::surface::ElementId;
    /// # use weft_core::identifier::Key;
    /// let id = ElementId::edge(Key::new("a->b"));
    /// assert_eq!(id.dom_id(), "edge-a--b");
    /// assert_eq!(ElementId::edge_label(Key::new("a->b")).dom_id(), "edge-a--b-label");
    /// ```
    pub fn edge(key: Key) -> Self {
        Self {
            kind: ElementKind::Edge,
            key,
            dom_id: edge_dom_id(key),
        }
    }

    pub fn edge_hover(key: Key) -> Self {
        Self {
            kind: ElementKind::EdgeHover,
            key,
            dom_id: format!("{}-hover", edge_dom_id(key)),
        }
    }

    pub fn edge_label(key: Key) -> Self {
        Self {
            kind: ElementKind::EdgeLabel,
            key,
            dom_id: format!("{}-label", edge_dom_id(key)),
        }
    }

    /// Marker ids are the marker name, unsanitized.
    pub fn marker(name: &str) -> Self {
        Self {
            kind: ElementKind::Marker,
            key: Key::new(name),
            dom_id: name.to_string(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The record key (or marker name) this element stands for.
    pub fn key(&self) -> Key {
        self.key
    }

    pub fn dom_id(&self) -> &str {
        &self.dom_id
    }
}

impl PartialEq for ElementId {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.key == other.key
    }
}

impl Eq for ElementId {}

impl Hash for ElementId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.key.hash(state);
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dom_id)
    }
}

fn edge_dom_id(key: Key) -> String {
    format!("edge-{}", key.dom_safe())
}

/// Node visual attributes, read through the node accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttrs {
    pub radius: f32,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
    pub label: Option<String>,
}

/// Edge visual attributes, read through the edge accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeAttrs {
    pub stroke: String,
    pub stroke_width: f32,
    pub opacity: f32,
    /// Marker drawn at the target end.
    pub marker_end: Option<String>,
    /// Marker drawn at the source end.
    pub marker_start: Option<String>,
}

/// Attributes of the hit-test copy of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverAttrs {
    pub stroke: String,
    pub stroke_width: f32,
    pub opacity: f32,
}

impl Default for HoverAttrs {
    fn default() -> Self {
        Self {
            stroke: HOVER_STROKE.to_string(),
            stroke_width: HOVER_STROKE_WIDTH,
            opacity: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelAttrs {
    pub text: String,
    /// Document id of the edge path the label follows.
    pub path_id: String,
}

/// Attributes of one keyed element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementAttrs {
    Node(NodeAttrs),
    Edge(EdgeAttrs),
    EdgeHover(HoverAttrs),
    EdgeLabel(LabelAttrs),
}

/// Geometry assigned to an element when the diagram is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Node group translated to its center.
    Translate(Point),
    /// Edge or hover line.
    Path(Segment),
    /// Edge label along `segment`.
    Label {
        segment: Segment,
        orientation: LabelOrientation,
    },
}

/// A keyed rendering target.
pub trait RenderSurface {
    /// Clears every element and prepares a canvas of `size`.
    fn reset(&mut self, size: Size, zoomable: bool);

    fn define_marker(&mut self, marker: &MarkerDefinition);

    /// Called before the first create, update or remove of a sync cycle.
    fn begin_cycle(&mut self) {}

    /// Called after the last create, update or remove of a sync cycle.
    fn end_cycle(&mut self) {}

    fn create(&mut self, id: &ElementId, attrs: &ElementAttrs);

    fn update(&mut self, id: &ElementId, attrs: &ElementAttrs);

    /// Fully removes the element.
    fn remove(&mut self, id: &ElementId);

    fn place(&mut self, id: &ElementId, placement: &Placement);

    fn zoom(&mut self, transform: Transform);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids() {
        let key = Key::new("x y");
        assert_eq!(ElementId::node(key).dom_id(), "node-x-y");
        assert_eq!(ElementId::edge(key).dom_id(), "edge-x-y");
        assert_eq!(ElementId::edge_hover(key).dom_id(), "edge-x-y-hover");
        assert_eq!(ElementId::edge_label(key).dom_id(), "edge-x-y-label");
        assert_eq!(ElementId::edge_label(key).kind(), ElementKind::EdgeLabel);
    }

    #[test]
    fn test_sanitized_collision_keeps_identity() {
        let spaced = ElementId::edge(Key::new("a b"));
        let dashed = ElementId::edge(Key::new("a-b"));

        assert_eq!(spaced.dom_id(), dashed.dom_id());
        assert_ne!(spaced, dashed);
        assert_eq!(spaced.key(), "a b");

        let ids: std::collections::HashSet<_> = [spaced, dashed].into_iter().collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_identity_includes_kind() {
        let key = Key::new("a");
        assert_ne!(ElementId::edge(key), ElementId::edge_label(key));
        assert_eq!(ElementId::node(key), ElementId::node(Key::new("a")));
    }

    #[test]
    fn test_hover_defaults() {
        let hover = HoverAttrs::default();
        assert_eq!(hover.stroke, "green");
        assert_eq!(hover.stroke_width, 10.0);
        assert_eq!(hover.opacity, 0.0);
    }
}
