//! Identity-preserving wrapper cache.
//!
//! [`KeyedCache`] owns one long-lived wrapper per node key and per edge key.
//! Wrapping a record a second time refreshes the wrapper in place: the
//! record and accessor-derived geometry are replaced, while the wrapper id
//! and solver-assigned state (position, velocity) survive.

use std::{collections::HashMap, fmt};

use indexmap::IndexMap;
use log::trace;

use weft_core::{
    geometry::{Point, Size},
    identifier::Key,
};

use crate::{
    accessor::{EdgeAccessors, NodeAccessors},
    record::Record,
};

/// Identity of a cached wrapper, assigned once when its key is first seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WrapperId(u64);

impl WrapperId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Key of a cached edge.
///
/// Record edges are keyed by their accessor key. Edges synthesized for a
/// circle constraint are keyed by the ordinal of the constraint and the
/// position on its rim, so each gets its own cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKey {
    Record(Key),
    Synthetic { circle: usize, rim: usize },
}

impl EdgeKey {
    /// Returns the record key, or `None` for synthetic edges.
    pub fn record(self) -> Option<Key> {
        match self {
            Self::Record(key) => Some(key),
            Self::Synthetic { .. } => None,
        }
    }

    pub fn is_synthetic(self) -> bool {
        matches!(self, Self::Synthetic { .. })
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(key) => write!(f, "{key}"),
            Self::Synthetic { circle, rim } => write!(f, "circle{circle}:{rim}"),
        }
    }
}

/// One end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The endpoint key is not part of the current node set.
    Unresolved,
    /// Position of the endpoint in the current frame's node list.
    Index(usize),
    /// Direct node identity, used by edges that never reach the solver.
    Node(Key),
}

impl Endpoint {
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(index),
            _ => None,
        }
    }
}

/// Long-lived node state.
#[derive(Debug, Clone)]
pub struct NodeWrapper<N> {
    id: WrapperId,
    key: Key,
    orig: Record<N>,
    radius: f32,
    stroke_width: f32,
    width: f32,
    height: f32,
    position: Option<Point>,
    velocity: Point,
    last_seen: u64,
}

impl<N> NodeWrapper<N> {
    pub fn id(&self) -> WrapperId {
        self.id
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// The record this wrapper was last refreshed from.
    pub fn orig(&self) -> &Record<N> {
        &self.orig
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Solver-assigned center, `None` until the first layout pass places it.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = Some(position);
    }

    pub fn set_velocity(&mut self, velocity: Point) {
        self.velocity = velocity;
    }
}

/// Long-lived edge state.
#[derive(Debug, Clone)]
pub struct EdgeWrapper<E> {
    id: WrapperId,
    key: EdgeKey,
    /// `None` for synthetic edges.
    orig: Option<Record<E>>,
    source_key: Option<Key>,
    target_key: Option<Key>,
    source: Endpoint,
    target: Endpoint,
    is_layout: bool,
    ideal_length: Option<f32>,
    length: f32,
    last_seen: u64,
}

impl<E> EdgeWrapper<E> {
    pub fn id(&self) -> WrapperId {
        self.id
    }

    pub fn key(&self) -> EdgeKey {
        self.key
    }

    pub fn orig(&self) -> Option<&Record<E>> {
        self.orig.as_ref()
    }

    pub fn source_key(&self) -> Option<Key> {
        self.source_key
    }

    pub fn target_key(&self) -> Option<Key> {
        self.target_key
    }

    pub fn source(&self) -> Endpoint {
        self.source
    }

    pub fn target(&self) -> Endpoint {
        self.target
    }

    /// Both endpoints resolve in the current frame.
    pub fn is_resolved(&self) -> bool {
        self.source.is_resolved() && self.target.is_resolved()
    }

    pub fn is_layout(&self) -> bool {
        self.is_layout
    }

    /// Preferred link length handed to the solver, if any.
    pub fn ideal_length(&self) -> Option<f32> {
        self.ideal_length
    }

    /// Visible length after clipping at both node boundaries.
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }

    pub fn set_length(&mut self, length: f32) {
        self.length = length;
    }

    /// Replaces both endpoints with direct node identities.
    ///
    /// Does nothing unless both endpoint keys are known.
    pub fn detach_endpoints(&mut self) {
        if let (Some(source), Some(target)) = (self.source_key, self.target_key) {
            self.source = Endpoint::Node(source);
            self.target = Endpoint::Node(target);
        }
    }
}

/// Owner of every node and edge wrapper, indexed by stable key.
#[derive(Debug)]
pub struct KeyedCache<N, E> {
    nodes: IndexMap<Key, NodeWrapper<N>>,
    edges: IndexMap<EdgeKey, EdgeWrapper<E>>,
    next_id: u64,
    generation: u64,
}

impl<N, E> Default for KeyedCache<N, E> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            next_id: 0,
            generation: 0,
        }
    }
}

impl<N, E> KeyedCache<N, E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> WrapperId {
        let id = WrapperId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Current redraw generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new redraw generation. Wrappers touched afterwards are
    /// stamped with it.
    pub fn advance_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Wraps a node record, reusing the cached wrapper for its key.
    ///
    /// `width` and `height` are `2 * radius + padding`.
    pub fn wrap_node(
        &mut self,
        record: Record<N>,
        accessors: &NodeAccessors<N>,
        padding: f32,
    ) -> &NodeWrapper<N> {
        let key = (accessors.key)(&record);
        let radius = (accessors.radius)(&record);
        let stroke_width = (accessors.stroke_width)(&record);
        let side = 2.0 * radius + padding;
        let generation = self.generation;

        if !self.nodes.contains_key(&key) {
            let id = self.allocate_id();
            trace!(key:% = key, id = id.value(); "Allocating node wrapper");
            self.nodes.insert(
                key,
                NodeWrapper {
                    id,
                    key,
                    orig: record,
                    radius,
                    stroke_width,
                    width: side,
                    height: side,
                    position: None,
                    velocity: Point::default(),
                    last_seen: generation,
                },
            );
        } else if let Some(wrapper) = self.nodes.get_mut(&key) {
            wrapper.orig = record;
            wrapper.radius = radius;
            wrapper.stroke_width = stroke_width;
            wrapper.width = side;
            wrapper.height = side;
            wrapper.last_seen = generation;
        }

        &self.nodes[&key]
    }

    /// Wraps an edge record, resolving its endpoints through `index`
    /// (node key to position in the current frame).
    pub fn wrap_edge(
        &mut self,
        record: Record<E>,
        accessors: &EdgeAccessors<E>,
        index: &HashMap<Key, usize>,
    ) -> &EdgeWrapper<E> {
        let key = EdgeKey::Record((accessors.key)(&record));
        let source_key = (accessors.source)(&record);
        let target_key = (accessors.target)(&record);
        let resolve = |node: Key| {
            index
                .get(&node)
                .map_or(Endpoint::Unresolved, |&i| Endpoint::Index(i))
        };
        let source = resolve(source_key);
        let target = resolve(target_key);
        let is_layout = (accessors.is_layout)(&record);
        let generation = self.generation;

        if !self.edges.contains_key(&key) {
            let id = self.allocate_id();
            trace!(key:% = key, id = id.value(); "Allocating edge wrapper");
            self.edges.insert(
                key,
                EdgeWrapper {
                    id,
                    key,
                    orig: Some(record),
                    source_key: Some(source_key),
                    target_key: Some(target_key),
                    source,
                    target,
                    is_layout,
                    ideal_length: None,
                    length: 0.0,
                    last_seen: generation,
                },
            );
        } else if let Some(wrapper) = self.edges.get_mut(&key) {
            wrapper.orig = Some(record);
            wrapper.source_key = Some(source_key);
            wrapper.target_key = Some(target_key);
            wrapper.source = source;
            wrapper.target = target;
            wrapper.is_layout = is_layout;
            wrapper.last_seen = generation;
        }

        &self.edges[&key]
    }

    /// Wraps a synthetic layout-only edge between two frame indices.
    pub fn wrap_synthetic(
        &mut self,
        circle: usize,
        rim: usize,
        source: usize,
        target: usize,
        ideal_length: f32,
    ) -> EdgeKey {
        let key = EdgeKey::Synthetic { circle, rim };
        let generation = self.generation;

        if !self.edges.contains_key(&key) {
            let id = self.allocate_id();
            self.edges.insert(
                key,
                EdgeWrapper {
                    id,
                    key,
                    orig: None,
                    source_key: None,
                    target_key: None,
                    source: Endpoint::Index(source),
                    target: Endpoint::Index(target),
                    is_layout: true,
                    ideal_length: Some(ideal_length),
                    length: 0.0,
                    last_seen: generation,
                },
            );
        } else if let Some(wrapper) = self.edges.get_mut(&key) {
            wrapper.source = Endpoint::Index(source);
            wrapper.target = Endpoint::Index(target);
            wrapper.ideal_length = Some(ideal_length);
            wrapper.last_seen = generation;
        }

        key
    }

    pub fn node(&self, key: Key) -> Option<&NodeWrapper<N>> {
        self.nodes.get(&key)
    }

    pub fn node_mut(&mut self, key: Key) -> Option<&mut NodeWrapper<N>> {
        self.nodes.get_mut(&key)
    }

    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeWrapper<E>> {
        self.edges.get(&key)
    }

    pub fn edge_mut(&mut self, key: EdgeKey) -> Option<&mut EdgeWrapper<E>> {
        self.edges.get_mut(&key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeWrapper<N>> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeWrapper<E>> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Forgets every wrapper, positions included.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Removes wrappers whose key was not seen within the last `max_idle`
    /// generations and returns how many were removed.
    pub fn prune(&mut self, max_idle: u64) -> usize {
        let generation = self.generation;
        let before = self.nodes.len() + self.edges.len();

        self.nodes
            .retain(|_, node| generation.saturating_sub(node.last_seen) <= max_idle);
        self.edges
            .retain(|_, edge| generation.saturating_sub(edge.last_seen) <= max_idle);

        before - (self.nodes.len() + self.edges.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::record::{EdgeValue, NodeValue};

    #[derive(Debug, Clone)]
    struct Node;

    impl NodeValue for Node {}

    #[derive(Debug, Clone)]
    struct Link(&'static str, &'static str);

    impl EdgeValue for Link {}

    fn link_accessors() -> EdgeAccessors<Link> {
        EdgeAccessors::new(|r| Key::new(r.value.0), |r| Key::new(r.value.1))
    }

    #[test]
    fn test_wrap_node_reuses_identity() {
        let mut cache: KeyedCache<Node, Link> = KeyedCache::new();
        let accessors = NodeAccessors::default();

        let id = cache.wrap_node(Record::new("a", Node), &accessors, 6.0).id();
        cache
            .node_mut(Key::new("a"))
            .unwrap()
            .set_position(Point::new(4.0, 2.0));

        let wrapper = cache.wrap_node(Record::new("a", Node), &accessors, 6.0);
        assert_eq!(wrapper.id(), id);
        assert_eq!(wrapper.position(), Some(Point::new(4.0, 2.0)));
        assert_eq!(wrapper.width(), 56.0);
        assert_eq!(cache.node_count(), 1);
    }

    #[test]
    fn test_wrap_edge_resolves_endpoints() {
        let mut cache: KeyedCache<Node, Link> = KeyedCache::new();
        let index = HashMap::from([(Key::new("a"), 0), (Key::new("b"), 1)]);

        let edge = cache.wrap_edge(Record::new("ab", Link("a", "b")), &link_accessors(), &index);
        assert_eq!(edge.source(), Endpoint::Index(0));
        assert_eq!(edge.target(), Endpoint::Index(1));
        assert!(edge.is_resolved());

        let edge = cache.wrap_edge(Record::new("ac", Link("a", "c")), &link_accessors(), &index);
        assert_eq!(edge.target(), Endpoint::Unresolved);
        assert!(!edge.is_resolved());
    }

    #[test]
    fn test_synthetic_edges_have_distinct_entries() {
        let mut cache: KeyedCache<Node, Link> = KeyedCache::new();
        let first = cache.wrap_synthetic(0, 0, 0, 1, 10.0);
        let second = cache.wrap_synthetic(0, 1, 1, 0, 10.0);
        let other_circle = cache.wrap_synthetic(1, 0, 0, 1, 10.0);

        assert_ne!(first, second);
        assert_ne!(first, other_circle);
        assert_eq!(cache.edge_count(), 3);
        assert!(cache.edge(first).unwrap().orig().is_none());
    }

    #[test]
    fn test_prune_drops_idle_entries() {
        let mut cache: KeyedCache<Node, Link> = KeyedCache::new();
        let accessors = NodeAccessors::default();

        cache.advance_generation();
        cache.wrap_node(Record::new("a", Node), &accessors, 0.0);
        cache.wrap_node(Record::new("b", Node), &accessors, 0.0);

        cache.advance_generation();
        cache.wrap_node(Record::new("a", Node), &accessors, 0.0);
        assert_eq!(cache.prune(1), 0);

        cache.advance_generation();
        cache.wrap_node(Record::new("a", Node), &accessors, 0.0);
        assert_eq!(cache.prune(1), 1);
        assert!(cache.node(Key::new("b")).is_none());
        assert!(cache.node(Key::new("a")).is_some());
    }
}
