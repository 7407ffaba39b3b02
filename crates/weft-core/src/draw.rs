//! Visual definitions shared by rendering surfaces.
//!
//! - [`StrokeDefinition`]: stroke color, width and opacity of nodes and edges
//! - [`MarkerDefinition`]: arrowhead/arrowtail marker definitions
//! - [`RenderLayer`]: z-order of the visual element kinds

mod layer;
mod marker;
mod stroke;

pub use layer::RenderLayer;
pub use marker::{MarkerDefinition, MarkerShape};
pub use stroke::StrokeDefinition;
