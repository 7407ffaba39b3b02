//! External records and the groupings that produce them.
//!
//! A diagram is fed by two groupings, one of nodes and one of edges. Both
//! are re-queried on every redraw and each yields an ordered list of
//! `{key, value}` [`Record`]s. Records are immutable inputs: everything the
//! diagram needs to remember between redraws lives in the cache wrappers.

use std::{cell::RefCell, rc::Rc};

use serde::Deserialize;

/// A single `{key, value}` entry of a grouping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record<V> {
    pub key: String,
    #[serde(flatten)]
    pub value: V,
}

impl<V> Record<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// A record describing one graph vertex.
pub type NodeRecord<N> = Record<N>;

/// A record describing one relation between two vertices.
pub type EdgeRecord<E> = Record<E>;

/// Fields of a node payload read by the default node accessors.
///
/// Every method has a default, so payloads only override what they carry.
pub trait NodeValue {
    fn label(&self) -> Option<&str> {
        None
    }

    fn name(&self) -> Option<&str> {
        None
    }

    fn radius(&self) -> Option<f32> {
        None
    }

    fn fill(&self) -> Option<&str> {
        None
    }

    fn stroke(&self) -> Option<&str> {
        None
    }
}

/// Fields of an edge payload read by the default edge accessors.
pub trait EdgeValue {
    /// Edges flagged `not_layout` are drawn but never handed to the solver.
    fn not_layout(&self) -> bool {
        false
    }
}

/// An ordered source of records, re-queried on every redraw.
pub trait Grouping<V> {
    fn all(&self) -> Vec<Record<V>>;
}

impl<V: Clone> Grouping<V> for Vec<Record<V>> {
    fn all(&self) -> Vec<Record<V>> {
        self.clone()
    }
}

/// Shared, caller-mutable records: edit them between redraws.
impl<V: Clone> Grouping<V> for Rc<RefCell<Vec<Record<V>>>> {
    fn all(&self) -> Vec<Record<V>> {
        self.borrow().clone()
    }
}

/// The pair of groupings a diagram is bound to.
pub struct DataSource<N, E> {
    nodes: Box<dyn Grouping<N>>,
    edges: Box<dyn Grouping<E>>,
}

impl<N, E> DataSource<N, E> {
    pub fn new(nodes: impl Grouping<N> + 'static, edges: impl Grouping<E> + 'static) -> Self {
        Self {
            nodes: Box::new(nodes),
            edges: Box::new(edges),
        }
    }

    /// Queries both groupings.
    pub fn query(&self) -> (Vec<NodeRecord<N>>, Vec<EdgeRecord<E>>) {
        (self.nodes.all(), self.edges.all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_grouping_sees_updates() {
        let shared = Rc::new(RefCell::new(vec![Record::new("a", 1)]));
        let source: DataSource<i32, i32> = DataSource::new(shared.clone(), Vec::new());

        assert_eq!(source.query().0.len(), 1);

        shared.borrow_mut().push(Record::new("b", 2));
        let (nodes, edges) = source.query();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].key, "b");
        assert!(edges.is_empty());
    }
}
