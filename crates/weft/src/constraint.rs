//! Declarative layout constraints and their expansion.
//!
//! A `circle` constraint has no direct solver counterpart. It is expanded
//! into a ring of synthetic, invisible layout edges whose preferred length
//! is the chord between neighbors on a circle of the configured radius.
//! Every other constraint is passed through to the solver unchanged.

use std::f32::consts::PI;

use log::{debug, warn};

use crate::{
    cache::{EdgeKey, KeyedCache},
    topology::Frame,
};

/// Axis a positional constraint acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A declarative layout constraint over frame node indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Arrange the nodes, in order, on a circle.
    Circle { nodes: Vec<usize> },
    /// Keep `right` at least (or exactly, with `equality`) `gap` after
    /// `left` along `axis`.
    Separation {
        axis: Axis,
        left: usize,
        right: usize,
        gap: f32,
        equality: bool,
    },
    /// Line the nodes up along `axis`, each at its offset.
    Alignment {
        axis: Axis,
        offsets: Vec<(usize, f32)>,
    },
    /// Any constraint type the core does not interpret.
    Other { kind: String, nodes: Vec<usize> },
}

impl Constraint {
    pub fn kind(&self) -> &str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Separation { .. } => "separation",
            Self::Alignment { .. } => "alignment",
            Self::Other { kind, .. } => kind,
        }
    }

    /// Every node index the constraint refers to.
    pub fn node_indices(&self) -> Vec<usize> {
        match self {
            Self::Circle { nodes } | Self::Other { nodes, .. } => nodes.clone(),
            Self::Separation { left, right, .. } => vec![*left, *right],
            Self::Alignment { offsets, .. } => offsets.iter().map(|(node, _)| *node).collect(),
        }
    }
}

/// Output of [`expand`]: what the solver receives.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    /// Layout edges of the frame followed by the synthetic rim edges.
    pub layout_edges: Vec<EdgeKey>,
    /// Every non-circle constraint, in request order.
    pub constraints: Vec<Constraint>,
}

/// Rim edges `i -> (i + 1) mod n` over `nodes`.
///
/// Fewer than two nodes make no ring.
///
/// # Examples
///
/// ```
/// # use weft::constraint::wheel_edges;
/// assert_eq!(wheel_edges(&[0, 1, 2]), vec![(0, 1), (1, 2), (2, 0)]);
/// assert!(wheel_edges(&[7]).is_empty());
/// ```
pub fn wheel_edges(nodes: &[usize]) -> Vec<(usize, usize)> {
    let n = nodes.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n).map(|i| (nodes[i], nodes[(i + 1) % n])).collect()
}

/// Distance between neighbors of `n` points spread evenly on a circle of
/// radius `radius`.
pub fn rim_length(radius: f32, n: usize) -> f32 {
    if n < 2 {
        return 0.0;
    }
    2.0 * radius * (PI / n as f32).sin()
}

/// Splits frame edges and constraint requests into what the solver sees.
///
/// Non-layout edges stay drawable but are dropped from the layout set; their
/// endpoints are switched to node identities so geometry does not depend on
/// the solver's indices. Circle constraints become synthetic edges, cached
/// under `(circle ordinal, rim position)`.
pub fn expand<N, E>(
    cache: &mut KeyedCache<N, E>,
    frame: &Frame,
    requests: Vec<Constraint>,
    circle_radius: f32,
) -> Expansion {
    let mut expansion = Expansion::default();

    for &key in frame.edges() {
        let Some(edge) = cache.edge_mut(key) else {
            continue;
        };
        if edge.is_layout() {
            expansion.layout_edges.push(key);
        } else {
            edge.detach_endpoints();
        }
    }

    let node_count = frame.nodes().len();
    let mut circles = 0usize;
    for request in requests {
        let nodes = match request {
            Constraint::Circle { nodes } => nodes,
            other => {
                expansion.constraints.push(other);
                continue;
            }
        };

        let circle = circles;
        circles += 1;

        let members: Vec<usize> = nodes
            .into_iter()
            .filter(|&index| {
                let in_range = index < node_count;
                if !in_range {
                    warn!(circle, index, node_count; "Circle constraint names a missing node, skipping it");
                }
                in_range
            })
            .collect();

        let length = rim_length(circle_radius, members.len());
        for (rim, (source, target)) in wheel_edges(&members).into_iter().enumerate() {
            let key = cache.wrap_synthetic(circle, rim, source, target, length);
            expansion.layout_edges.push(key);
        }
    }

    debug!(
        layout_edges = expansion.layout_edges.len(),
        constraints = expansion.constraints.len(),
        circles;
        "Expanded constraints"
    );

    expansion
}
