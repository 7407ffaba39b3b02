//! Binding of raw groupings into the current frame.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use weft_core::identifier::Key;

use crate::{
    accessor::{EdgeAccessors, NodeAccessors},
    cache::{EdgeKey, KeyedCache},
    record::{EdgeRecord, NodeRecord},
};

/// The node and edge lists of one redraw.
///
/// Node order defines the indices edges and constraints refer to. Only edges
/// whose endpoints both resolved are present.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    nodes: Vec<Key>,
    edges: Vec<EdgeKey>,
    index: HashMap<Key, usize>,
}

impl Frame {
    pub fn nodes(&self) -> &[Key] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    /// Position of a node key in [`Frame::nodes`].
    pub fn index_of(&self, key: Key) -> Option<usize> {
        self.index.get(&key).copied()
    }

    pub fn node_at(&self, index: usize) -> Option<Key> {
        self.nodes.get(index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Wraps every record through `cache` and resolves edge endpoints against
/// the current node list.
///
/// A node key seen twice keeps its first position. Edges naming a node that
/// is not in `node_records` are left out of the frame but keep their cache
/// entry.
pub fn bind<N, E>(
    cache: &mut KeyedCache<N, E>,
    node_records: Vec<NodeRecord<N>>,
    edge_records: Vec<EdgeRecord<E>>,
    node_accessors: &NodeAccessors<N>,
    edge_accessors: &EdgeAccessors<E>,
    padding: f32,
) -> Frame {
    let mut frame = Frame::default();

    for record in node_records {
        let key = (node_accessors.key)(&record);
        if frame.index.contains_key(&key) {
            warn!(key:% = key; "Duplicate node key in grouping, keeping first occurrence");
            continue;
        }
        cache.wrap_node(record, node_accessors, padding);
        frame.index.insert(key, frame.nodes.len());
        frame.nodes.push(key);
    }

    let mut dangling = 0usize;
    let mut seen = HashSet::new();
    for record in edge_records {
        let key = (edge_accessors.key)(&record);
        if !seen.insert(key) {
            warn!(key:% = key; "Duplicate edge key in grouping, keeping first occurrence");
            continue;
        }
        let edge = cache.wrap_edge(record, edge_accessors, &frame.index);
        if edge.is_resolved() {
            frame.edges.push(edge.key());
        } else {
            dangling += 1;
        }
    }

    debug!(
        nodes = frame.nodes.len(),
        edges = frame.edges.len(),
        dangling;
        "Bound topology"
    );

    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        cache::Endpoint,
        record::{EdgeValue, NodeValue, Record},
    };

    #[derive(Debug, Clone)]
    struct Node;

    impl NodeValue for Node {}

    #[derive(Debug, Clone)]
    struct Link(&'static str, &'static str);

    impl EdgeValue for Link {}

    fn bind_records(
        cache: &mut KeyedCache<Node, Link>,
        nodes: &[&str],
        edges: &[(&str, Link)],
    ) -> Frame {
        bind(
            cache,
            nodes.iter().map(|key| Record::new(*key, Node)).collect(),
            edges
                .iter()
                .map(|(key, link)| Record::new(*key, link.clone()))
                .collect(),
            &NodeAccessors::default(),
            &EdgeAccessors::new(|r| Key::new(r.value.0), |r| Key::new(r.value.1)),
            6.0,
        )
    }

    #[test]
    fn test_dangling_edge_excluded_but_cached() {
        let mut cache = KeyedCache::new();
        let frame = bind_records(
            &mut cache,
            &["A", "B"],
            &[("AB", Link("A", "B")), ("AC", Link("A", "C"))],
        );

        assert_eq!(frame.nodes().len(), 2);
        assert_eq!(frame.edges(), &[EdgeKey::Record(Key::new("AB"))]);

        let cached = cache.edge(EdgeKey::Record(Key::new("AC"))).unwrap();
        assert_eq!(cached.target(), Endpoint::Unresolved);
    }

    #[test]
    fn test_index_rebuilt_per_bind() {
        let mut cache = KeyedCache::new();
        bind_records(&mut cache, &["A", "B"], &[]);
        let frame = bind_records(&mut cache, &["B", "A"], &[("BA", Link("B", "A"))]);

        assert_eq!(frame.index_of(Key::new("B")), Some(0));
        assert_eq!(frame.index_of(Key::new("A")), Some(1));
        let edge = cache.edge(EdgeKey::Record(Key::new("BA"))).unwrap();
        assert_eq!(edge.source(), Endpoint::Index(0));
        assert_eq!(edge.target(), Endpoint::Index(1));
    }

    #[test]
    fn test_duplicate_node_keys_keep_first() {
        let mut cache = KeyedCache::new();
        let frame = bind_records(&mut cache, &["A", "B", "A"], &[]);
        assert_eq!(frame.nodes(), &[Key::new("A"), Key::new("B")]);
    }
}
