//! Minimum-degree filtering
//!
//! One pass: degrees are measured once on the input graph and every node
//! below the threshold is removed together with its edges. Survivors whose
//! degree drops under the threshold because a neighbor was removed are kept;
//! this is not a k-core.

use crate::graph::{NetworkGraph, NodeId};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Before/after counts of one filtering pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub min_degree: usize,
    pub original_nodes: usize,
    pub original_edges: usize,
    pub nodes_removed: usize,
    pub edges_removed: usize,
}

/// Remove nodes with degree below `min_degree`.
///
/// `min_degree <= 1` returns the input unchanged. A `protected` node is
/// never removed, whatever its degree.
pub fn filter_by_min_degree(
    graph: NetworkGraph,
    min_degree: usize,
    protected: Option<&NodeId>,
) -> NetworkGraph {
    filter_with_summary(graph, min_degree, protected).0
}

/// Like [`filter_by_min_degree`], also reporting what was removed
pub fn filter_with_summary(
    graph: NetworkGraph,
    min_degree: usize,
    protected: Option<&NodeId>,
) -> (NetworkGraph, FilterSummary) {
    let mut summary = FilterSummary {
        min_degree,
        original_nodes: graph.node_count(),
        original_edges: graph.edge_count(),
        nodes_removed: 0,
        edges_removed: 0,
    };
    if min_degree <= 1 {
        return (graph, summary);
    }

    let removed: HashSet<NodeId> = graph
        .node_ids()
        .filter(|id| Some(*id) != protected && graph.degree(id) < min_degree)
        .cloned()
        .collect();
    if removed.is_empty() {
        return (graph, summary);
    }

    let filtered = graph.without_nodes(&removed);
    summary.nodes_removed = removed.len();
    summary.edges_removed = summary.original_edges - filtered.edge_count();
    debug!(
        "Degree filter >= {} removed {} nodes and {} edges",
        min_degree, summary.nodes_removed, summary.edges_removed
    );
    (filtered, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    /// Star around "hub" with a tail: hub-a, hub-b, hub-c, c-d
    fn star_with_tail() -> NetworkGraph {
        let mut graph = NetworkGraph::new();
        for leaf in ["a", "b", "c"] {
            graph.add_edge(id("hub"), id(leaf), 1).unwrap();
        }
        graph.add_edge(id("c"), id("d"), 1).unwrap();
        graph
    }

    #[test]
    fn test_threshold_one_is_identity() {
        let graph = star_with_tail();
        let (filtered, summary) = filter_with_summary(graph.clone(), 1, None);
        assert_eq!(filtered, graph);
        assert_eq!(summary.nodes_removed, 0);
    }

    #[test]
    fn test_single_pass() {
        let filtered = filter_by_min_degree(star_with_tail(), 2, None);
        // a, b and d have degree 1; c keeps degree 1 afterwards but survives
        let ids: Vec<&str> = filtered.node_ids().map(|n| n.as_str()).collect();
        assert_eq!(ids, vec!["hub", "c"]);
        assert_eq!(filtered.degree(&id("c")), 1);
    }

    #[test]
    fn test_protected_node_survives() {
        let graph = star_with_tail();
        let focal = id("d");
        let (filtered, summary) = filter_with_summary(graph, 2, Some(&focal));
        assert!(filtered.contains(&focal));
        assert!(filtered.has_edge(&id("c"), &focal));
        assert_eq!(summary.nodes_removed, 2);
        assert_eq!(summary.edges_removed, 2);
    }

    #[test]
    fn test_high_threshold_empties_graph() {
        let filtered = filter_by_min_degree(star_with_tail(), 10, None);
        assert!(filtered.is_empty());
    }
}
