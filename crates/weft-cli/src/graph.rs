//! TOML graph files.
//!
//! A graph file lists `[[nodes]]`, `[[edges]]` and optional
//! `[[constraints]]` tables. Constraints name their nodes by key; they are
//! resolved to frame indices each time the diagram asks for them.
//!
//! ```toml
//! [[nodes]]
//! key = "a"
//! label = "Alpha"
//!
//! [[nodes]]
//! key = "b"
//!
//! [[edges]]
//! key = "a-b"
//! source = "a"
//! target = "b"
//!
//! [[constraints]]
//! type = "circle"
//! nodes = ["a", "b"]
//! ```

use std::{collections::HashMap, ops::Range};

use log::warn;
use serde::Deserialize;
use thiserror::Error;

use weft::{
    accessor::{Accessors, EdgeAccessors, NodeAccessors},
    cache::NodeWrapper,
    constraint::{Axis, Constraint},
    identifier::Key,
    record::{EdgeRecord, EdgeValue, NodeRecord, NodeValue, Record},
};

/// Errors raised while reading a graph file.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The file is not valid TOML or does not match the graph layout.
    #[error("Failed to parse graph file")]
    Parse {
        #[source]
        err: toml::de::Error,
        /// Text of the graph file, kept for diagnostics.
        src: String,
    },
}

impl GraphError {
    /// Byte range of the offending input, when the parser reports one.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            Self::Parse { err, .. } => err.span(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Parse { err, .. } => err.message(),
        }
    }

    pub fn src(&self) -> &str {
        match self {
            Self::Parse { src, .. } => src,
        }
    }
}

/// Payload of a `[[nodes]]` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeEntry {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
}

impl NodeValue for NodeEntry {
    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn radius(&self) -> Option<f32> {
        self.radius
    }

    fn fill(&self) -> Option<&str> {
        self.fill.as_deref()
    }

    fn stroke(&self) -> Option<&str> {
        self.stroke.as_deref()
    }
}

/// Payload of an `[[edges]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeEntry {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub not_layout: bool,
    /// Marker drawn at the source end, if any.
    #[serde(default)]
    pub arrowtail: Option<String>,
}

impl EdgeValue for EdgeEntry {
    fn not_layout(&self) -> bool {
        self.not_layout
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisEntry {
    X,
    Y,
}

impl From<AxisEntry> for Axis {
    fn from(axis: AxisEntry) -> Self {
        match axis {
            AxisEntry::X => Axis::X,
            AxisEntry::Y => Axis::Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OffsetEntry {
    pub node: String,
    #[serde(default)]
    pub offset: f32,
}

/// A `[[constraints]]` entry, keyed by node keys.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConstraintEntry {
    Circle {
        nodes: Vec<String>,
    },
    Separation {
        axis: AxisEntry,
        left: String,
        right: String,
        gap: f32,
        #[serde(default)]
        equality: bool,
    },
    Alignment {
        axis: AxisEntry,
        offsets: Vec<OffsetEntry>,
    },
}

impl ConstraintEntry {
    /// Resolves node keys to indices in `index`.
    ///
    /// Circle members that are missing are dropped. Separation and alignment
    /// entries naming a missing node are skipped entirely.
    fn resolve(&self, index: &HashMap<Key, usize>) -> Option<Constraint> {
        let lookup = |key: &str| {
            let found = index.get(&Key::new(key)).copied();
            if found.is_none() {
                warn!(node = key; "Constraint names an unknown node");
            }
            found
        };

        match self {
            Self::Circle { nodes } => Some(Constraint::Circle {
                nodes: nodes.iter().filter_map(|key| lookup(key.as_str())).collect(),
            }),
            Self::Separation {
                axis,
                left,
                right,
                gap,
                equality,
            } => Some(Constraint::Separation {
                axis: (*axis).into(),
                left: lookup(left.as_str())?,
                right: lookup(right.as_str())?,
                gap: *gap,
                equality: *equality,
            }),
            Self::Alignment { axis, offsets } => {
                let offsets = offsets
                    .iter()
                    .map(|entry| Some((lookup(entry.node.as_str())?, entry.offset)))
                    .collect::<Option<Vec<_>>>()?;
                Some(Constraint::Alignment {
                    axis: (*axis).into(),
                    offsets,
                })
            }
        }
    }
}

/// A parsed graph file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<NodeRecord<NodeEntry>>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord<EdgeEntry>>,
    #[serde(default)]
    pub constraints: Vec<ConstraintEntry>,
}

impl Graph {
    /// Parses a graph from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Parse`] if the source is not a valid graph file.
    pub fn parse(source: &str) -> Result<Self, GraphError> {
        toml::from_str(source).map_err(|err| GraphError::Parse {
            err,
            src: source.to_string(),
        })
    }

    /// Constraint requests for the given frame nodes, in frame order.
    pub fn constraints_for(&self, nodes: &[&NodeWrapper<NodeEntry>]) -> Vec<Constraint> {
        let index: HashMap<Key, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.key(), i))
            .collect();
        self.constraints
            .iter()
            .filter_map(|entry| entry.resolve(&index))
            .collect()
    }
}

/// Accessors reading [`NodeEntry`] and [`EdgeEntry`] payloads.
pub fn accessors() -> Accessors<NodeEntry, EdgeEntry> {
    let mut edge = EdgeAccessors::new(
        |record: &Record<EdgeEntry>| Key::new(&record.value.source),
        |record: &Record<EdgeEntry>| Key::new(&record.value.target),
    );
    edge.label = |record| record.value.label.clone();
    edge.arrowtail = |record| record.value.arrowtail.clone();

    Accessors {
        node: NodeAccessors::default(),
        edge,
    }
}
