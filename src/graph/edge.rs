//! Weighted undirected edge
//!
//! An edge joins two distinct nodes; its weight counts how many times the pair
//! co-occurred across all relation channels.

use super::types::NodeId;
use serde::{Deserialize, Serialize};

/// An undirected weighted edge, as listed by [`super::NetworkGraph::edges`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Endpoint that was inserted into the graph first
    pub source: NodeId,

    /// The other endpoint
    pub target: NodeId,

    /// Co-occurrence frequency, always >= 1
    pub weight: u32,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, weight: u32) -> Self {
        Edge {
            source,
            target,
            weight,
        }
    }

    /// Whether the edge joins `a` and `b`, in either orientation
    pub fn joins(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_is_unordered() {
        let edge = Edge::new(NodeId::new("a"), NodeId::new("b"), 2);
        assert!(edge.joins(&NodeId::new("b"), &NodeId::new("a")));
        assert!(!edge.joins(&NodeId::new("a"), &NodeId::new("c")));
    }
}
