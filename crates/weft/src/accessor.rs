//! Accessor configuration.
//!
//! Every visual or structural property of a record is read through a plain
//! function stored in [`NodeAccessors`] or [`EdgeAccessors`]. Defaults match
//! the conventional record shape (`label`/`name` on nodes, `not_layout` on
//! edges); callers replace individual fields to read their own payloads.

use weft_core::identifier::Key;

use crate::record::{EdgeValue, NodeValue, Record};

/// Default node radius in layout units.
pub const DEFAULT_NODE_RADIUS: f32 = 25.0;

/// Default arrowhead marker name.
pub const DEFAULT_ARROWHEAD: &str = "vee";

/// Accessor functions reading node records.
pub struct NodeAccessors<N> {
    pub key: fn(&Record<N>) -> Key,
    pub radius: fn(&Record<N>) -> f32,
    pub stroke: fn(&Record<N>) -> String,
    pub stroke_width: fn(&Record<N>) -> f32,
    pub fill: fn(&Record<N>) -> String,
    pub label: fn(&Record<N>) -> Option<String>,
}

impl<N: NodeValue> Default for NodeAccessors<N> {
    fn default() -> Self {
        Self {
            key: |record| Key::new(&record.key),
            radius: |record| record.value.radius().unwrap_or(DEFAULT_NODE_RADIUS),
            stroke: |record| record.value.stroke().unwrap_or("black").to_string(),
            stroke_width: |_| 1.0,
            fill: |record| record.value.fill().unwrap_or("white").to_string(),
            label: |record| {
                record
                    .value
                    .label()
                    .or_else(|| record.value.name())
                    .map(str::to_string)
            },
        }
    }
}

impl<N> Clone for NodeAccessors<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for NodeAccessors<N> {}

/// Accessor functions reading edge records.
///
/// There is no meaningful default for an edge's endpoints, so the source and
/// target accessors are required by [`EdgeAccessors::new`].
pub struct EdgeAccessors<E> {
    pub key: fn(&Record<E>) -> Key,
    pub source: fn(&Record<E>) -> Key,
    pub target: fn(&Record<E>) -> Key,
    pub stroke: fn(&Record<E>) -> String,
    pub stroke_width: fn(&Record<E>) -> f32,
    pub opacity: fn(&Record<E>) -> f32,
    /// `None` falls back to the edge key.
    pub label: fn(&Record<E>) -> Option<String>,
    pub arrowhead: fn(&Record<E>) -> Option<String>,
    pub arrowtail: fn(&Record<E>) -> Option<String>,
    pub is_layout: fn(&Record<E>) -> bool,
}

impl<E: EdgeValue> EdgeAccessors<E> {
    pub fn new(source: fn(&Record<E>) -> Key, target: fn(&Record<E>) -> Key) -> Self {
        Self {
            key: |record| Key::new(&record.key),
            source,
            target,
            stroke: |_| "black".to_string(),
            stroke_width: |_| 1.0,
            opacity: |_| 1.0,
            label: |_| None,
            arrowhead: |_| Some(DEFAULT_ARROWHEAD.to_string()),
            arrowtail: |_| None,
            is_layout: |record| !record.value.not_layout(),
        }
    }
}

impl<E> EdgeAccessors<E> {
    /// The label text of an edge, falling back to its key.
    pub fn label_of(&self, record: &Record<E>) -> String {
        (self.label)(record).unwrap_or_else(|| (self.key)(record).to_string())
    }
}

impl<E> Clone for EdgeAccessors<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EdgeAccessors<E> {}

/// Node and edge accessors bundled for a diagram.
pub struct Accessors<N, E> {
    pub node: NodeAccessors<N>,
    pub edge: EdgeAccessors<E>,
}

impl<N: NodeValue, E> Accessors<N, E> {
    /// Default node accessors together with the given edge accessors.
    pub fn with_edges(edge: EdgeAccessors<E>) -> Self {
        Self {
            node: NodeAccessors::default(),
            edge,
        }
    }
}
