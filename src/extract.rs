//! Focal sub-network extraction
//!
//! Both views are derived from an already built global graph and never
//! modify it. A focal id that is not in the graph yields an empty graph.

use crate::graph::{NetworkGraph, NodeId};
use serde::Serialize;
use std::iter;

/// Subgraph induced by the focal node and its neighbors, including the
/// edges between neighbors
pub fn ego_network(graph: &NetworkGraph, focal: &NodeId) -> NetworkGraph {
    if !graph.contains(focal) {
        return NetworkGraph::new();
    }
    graph.induced_subgraph(iter::once(focal).chain(graph.neighbors(focal)))
}

/// Star of the focal node: its direct edges only, with their weights and
/// the endpoint attributes
pub fn direct_network(graph: &NetworkGraph, focal: &NodeId) -> NetworkGraph {
    let mut star = NetworkGraph::new();
    let Some(center) = graph.node(focal) else {
        return star;
    };
    star.insert_node(center.clone());

    for neighbor in graph.neighbors(focal) {
        let (Some(node), Some(weight)) = (graph.node(neighbor), graph.weight(focal, neighbor))
        else {
            continue;
        };
        star.insert_node(node.clone());
        // Neighbors are distinct from the focal node and from each other
        let _ = star.add_edge(focal.clone(), neighbor.clone(), weight);
    }
    star
}

/// Focal node details reported next to a focal sub-network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocalSummary {
    pub id: NodeId,
    pub name: String,
    pub degree: usize,
    pub direct_connections: Vec<NodeId>,
}

pub fn focal_summary(graph: &NetworkGraph, focal: &NodeId) -> Option<FocalSummary> {
    let node = graph.node(focal)?;
    Some(FocalSummary {
        id: focal.clone(),
        name: node.label.clone(),
        degree: graph.degree(focal),
        direct_connections: graph.neighbors(focal).cloned().collect(),
    })
}
