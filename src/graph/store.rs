//! In-memory network storage
//!
//! An undirected, weighted simple graph owned by the query that built it.
//! Transforms (filtering, extraction) produce new graphs rather than editing a
//! shared instance.

use super::edge::Edge;
use super::node::Node;
use super::types::NodeId;
use actnet_algorithms::GraphView;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Self-loop on node {0} is not allowed")]
    SelfLoop(NodeId),

    #[error("Edge {0} - {1} must have weight >= 1")]
    ZeroWeight(NodeId, NodeId),

    #[error("Edge {0} - {1} already exists")]
    EdgeAlreadyExists(NodeId, NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// In-memory undirected network
///
/// - nodes: NodeId -> Node, in insertion order
/// - adjacency: NodeId -> (neighbor -> weight), kept symmetric
///
/// Insertion order is the iteration order of every query and the dense index
/// order of [`NetworkGraph::view`], so rankings and layouts are reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkGraph {
    nodes: IndexMap<NodeId, Node>,
    adjacency: IndexMap<NodeId, IndexMap<NodeId, u32>>,
    edge_count: usize,
}

impl NetworkGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or lazily create the node with this identifier
    pub fn add_node(&mut self, id: NodeId) -> &mut Node {
        self.adjacency.entry(id.clone()).or_default();
        self.nodes
            .entry(id.clone())
            .or_insert_with(|| Node::new(id))
    }

    /// Insert a node with its attributes; an existing node is left untouched
    pub fn insert_node(&mut self, node: Node) {
        if !self.nodes.contains_key(&node.id) {
            self.adjacency.insert(node.id.clone(), IndexMap::new());
            self.nodes.insert(node.id.clone(), node);
        }
    }

    /// Add an undirected edge, creating missing endpoints.
    ///
    /// Rejects self-loops, zero weights and duplicate pairs so the graph
    /// stays simple.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: u32) -> GraphResult<()> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        if weight == 0 {
            return Err(GraphError::ZeroWeight(a, b));
        }
        if self.has_edge(&a, &b) {
            return Err(GraphError::EdgeAlreadyExists(a, b));
        }

        self.add_node(a.clone());
        self.add_node(b.clone());
        if let Some(row) = self.adjacency.get_mut(&a) {
            row.insert(b.clone(), weight);
        }
        if let Some(row) = self.adjacency.get_mut(&b) {
            row.insert(a, weight);
        }
        self.edge_count += 1;
        Ok(())
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Dense index of a node (its insertion position)
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Node at a dense index
    pub fn node_at(&self, idx: usize) -> Option<&Node> {
        self.nodes.get_index(idx).map(|(_, node)| node)
    }

    /// Label of a node, falling back to its identifier
    pub fn label_of(&self, id: &NodeId) -> String {
        self.nodes
            .get(id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Neighbors of a node; empty when the node does not exist
    pub fn neighbors<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.adjacency.get(id).into_iter().flat_map(|row| row.keys())
    }

    pub fn degree(&self, id: &NodeId) -> usize {
        self.adjacency.get(id).map_or(0, |row| row.len())
    }

    pub fn has_edge(&self, a: &NodeId, b: &NodeId) -> bool {
        self.weight(a, b).is_some()
    }

    pub fn weight(&self, a: &NodeId, b: &NodeId) -> Option<u32> {
        self.adjacency.get(a).and_then(|row| row.get(b)).copied()
    }

    /// Every edge exactly once, oriented from the earlier-inserted endpoint
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (idx, (id, row)) in self.adjacency.iter().enumerate() {
            for (neighbor, &weight) in row {
                if self.index_of(neighbor).map_or(false, |n| n > idx) {
                    edges.push(Edge::new(id.clone(), neighbor.clone(), weight));
                }
            }
        }
        edges
    }

    /// Copy of this graph without `removed` and their incident edges
    pub fn without_nodes(&self, removed: &HashSet<NodeId>) -> NetworkGraph {
        let kept: Vec<&NodeId> = self.node_ids().filter(|id| !removed.contains(*id)).collect();
        self.induced_subgraph(kept)
    }

    /// Subgraph induced by `keep`, preserving this graph's node order and
    /// all node and edge attributes. Unknown identifiers are ignored.
    pub fn induced_subgraph<'a, I>(&self, keep: I) -> NetworkGraph
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let keep: HashSet<&NodeId> = keep.into_iter().collect();
        let mut sub = NetworkGraph::new();

        for node in self.nodes() {
            if keep.contains(&node.id) {
                sub.insert_node(node.clone());
            }
        }
        for edge in self.edges() {
            if keep.contains(&edge.source) && keep.contains(&edge.target) {
                // Endpoints are distinct and the pair is unique in `self`
                let _ = sub.add_edge(edge.source, edge.target, edge.weight);
            }
        }
        sub
    }

    /// Dense algorithm view; index `i` is the `i`-th inserted node
    pub fn view(&self) -> GraphView {
        let edges: Vec<(usize, usize, f64)> = self
            .edges()
            .iter()
            .filter_map(|e| {
                let u = self.index_of(&e.source)?;
                let v = self.index_of(&e.target)?;
                Some((u, v, e.weight as f64))
            })
            .collect();
        GraphView::from_edges(self.node_count(), &edges)
    }
}

impl Serialize for NetworkGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&Node> = self.nodes().collect();
        let mut state = serializer.serialize_struct("NetworkGraph", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &self.edges())?;
        state.end()
    }
}
