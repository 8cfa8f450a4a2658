//! Shared utilities for graph algorithms
//!
//! Provides a read-only, dense view of an undirected graph for algorithm execution.

use thiserror::Error;

/// Dense node index (0..N) used by every algorithm in this crate
pub type NodeIndex = usize;

/// Errors raised by iterative algorithms
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgorithmError {
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("power iteration failed to converge within {0} iterations")]
    NotConverged(usize),
}

/// A dense, integer-indexed view of an undirected simple graph using
/// Compressed Sparse Row (CSR) format.
///
/// Every undirected edge is stored twice, once in the neighbor list of each
/// endpoint. Neighbor order follows the order edges were supplied in.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Offsets into `targets`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor indices
    pub targets: Vec<NodeIndex>,
    /// Edge weights, aligned with `targets`
    pub weights: Vec<f64>,
}

impl GraphView {
    /// Build a view from an undirected edge list `(u, v, weight)`.
    ///
    /// Self-loops are skipped. Callers are responsible for not supplying the
    /// same unordered pair twice.
    pub fn from_edges(node_count: usize, edges: &[(NodeIndex, NodeIndex, f64)]) -> Self {
        let mut adjacency: Vec<Vec<(NodeIndex, f64)>> = vec![Vec::new(); node_count];
        for &(u, v, w) in edges {
            if u == v || u >= node_count || v >= node_count {
                continue;
            }
            adjacency[u].push((v, w));
            adjacency[v].push((u, w));
        }
        Self::from_adjacency_list(adjacency)
    }

    /// Flatten per-node neighbor lists into CSR
    pub fn from_adjacency_list(adjacency: Vec<Vec<(NodeIndex, f64)>>) -> Self {
        let node_count = adjacency.len();
        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut targets = Vec::new();
        let mut weights = Vec::new();

        offsets.push(0);
        for neighbors in adjacency {
            for (v, w) in neighbors {
                targets.push(v);
                weights.push(w);
            }
            offsets.push(targets.len());
        }

        GraphView {
            node_count,
            offsets,
            targets,
            weights,
        }
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Degree of a node (by index)
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Neighbors of a node
    pub fn neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.targets[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Weights of the edges incident to a node, aligned with `neighbors`
    pub fn weights(&self, idx: NodeIndex) -> &[f64] {
        &self.weights[self.offsets[idx]..self.offsets[idx + 1]]
    }

    pub fn has_edge(&self, u: NodeIndex, v: NodeIndex) -> bool {
        self.neighbors(u).contains(&v)
    }

    /// Induced subgraph on `nodes`.
    ///
    /// Returns the sub-view together with the mapping from sub-view index to
    /// the index in `self`.
    pub fn induced(&self, nodes: &[NodeIndex]) -> (GraphView, Vec<NodeIndex>) {
        let mut local = vec![usize::MAX; self.node_count];
        for (i, &n) in nodes.iter().enumerate() {
            local[n] = i;
        }

        let adjacency = nodes
            .iter()
            .map(|&n| {
                self.neighbors(n)
                    .iter()
                    .zip(self.weights(n))
                    .filter(|&(&v, _)| local[v] != usize::MAX)
                    .map(|(&v, &w)| (local[v], w))
                    .collect()
            })
            .collect();

        (GraphView::from_adjacency_list(adjacency), nodes.to_vec())
    }
}

/// Mean and population standard deviation of a sample
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
