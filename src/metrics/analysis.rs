//! Whole-network summaries: two-network comparison and connectivity
//! diagnostics.

use crate::graph::{NetworkGraph, NodeId};
use actnet_algorithms::{average_clustering, connected_components, density};
use serde::Serialize;
use std::collections::HashSet;

/// Global statistics of one network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStats {
    pub label: String,
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub components: usize,
    pub avg_clustering: f64,
}

impl NetworkStats {
    pub fn of(graph: &NetworkGraph, label: impl Into<String>) -> Self {
        let view = graph.view();
        NetworkStats {
            label: label.into(),
            nodes: view.node_count,
            edges: view.edge_count(),
            density: density(&view),
            components: connected_components(&view).count(),
            avg_clustering: average_clustering(&view),
        }
    }
}

/// Second network minus first network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkChanges {
    pub nodes_change: i64,
    pub edges_change: i64,
    pub density_change: f64,
    pub components_change: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkComparison {
    pub first: NetworkStats,
    pub second: NetworkStats,
    pub common_nodes: usize,
    /// Common nodes over the larger node count
    pub node_overlap: f64,
    pub changes: NetworkChanges,
}

pub fn compare_networks(
    first: &NetworkGraph,
    first_label: &str,
    second: &NetworkGraph,
    second_label: &str,
) -> NetworkComparison {
    let a = NetworkStats::of(first, first_label);
    let b = NetworkStats::of(second, second_label);

    let first_ids: HashSet<&NodeId> = first.node_ids().collect();
    let common_nodes = second.node_ids().filter(|id| first_ids.contains(id)).count();
    let larger = a.nodes.max(b.nodes);
    let node_overlap = if larger > 0 {
        common_nodes as f64 / larger as f64
    } else {
        0.0
    };

    let changes = NetworkChanges {
        nodes_change: b.nodes as i64 - a.nodes as i64,
        edges_change: b.edges as i64 - a.edges as i64,
        density_change: b.density - a.density,
        components_change: b.components as i64 - a.components as i64,
    };

    NetworkComparison {
        first: a,
        second: b,
        common_nodes,
        node_overlap,
        changes,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentSummary {
    pub component_id: usize,
    pub size: usize,
    pub sample_nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

/// Component breakdown of a network with human-readable findings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectivityReport {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub is_connected: bool,
    pub components: Vec<ComponentSummary>,
    pub isolated_nodes: usize,
    pub sample_edges: Vec<SampleEdge>,
    pub issues: Vec<String>,
}

const COMPONENT_SAMPLE: usize = 5;
const EDGE_SAMPLE: usize = 10;

pub fn connectivity_report(graph: &NetworkGraph) -> ConnectivityReport {
    let view = graph.view();
    let components = connected_components(&view);
    let label = |idx: usize| graph.node_at(idx).map(|n| n.label.clone()).unwrap_or_default();

    let summaries = components
        .members
        .iter()
        .enumerate()
        .map(|(component_id, members)| ComponentSummary {
            component_id,
            size: members.len(),
            sample_nodes: members.iter().take(COMPONENT_SAMPLE).map(|&i| label(i)).collect(),
        })
        .collect();

    let isolated_nodes = (0..view.node_count).filter(|&i| view.degree(i) == 0).count();
    let is_connected = components.is_connected();

    let mut issues = Vec::new();
    if graph.is_empty() {
        issues.push("Network has no nodes".to_string());
    } else if !is_connected {
        let largest = components.largest().map_or(0, |c| c.len());
        issues.push(format!(
            "Network has {} separate components. Largest has {} nodes ({:.1}% of total).",
            components.count(),
            largest,
            largest as f64 / view.node_count as f64 * 100.0
        ));
        if isolated_nodes > 0 {
            issues.push(format!("Found {} isolated nodes with no connections", isolated_nodes));
        }
    }

    let sample_edges = graph
        .edges()
        .into_iter()
        .take(EDGE_SAMPLE)
        .map(|e| SampleEdge {
            source: graph.label_of(&e.source),
            target: graph.label_of(&e.target),
            weight: e.weight,
        })
        .collect();

    ConnectivityReport {
        total_nodes: view.node_count,
        total_edges: view.edge_count(),
        is_connected,
        components: summaries,
        isolated_nodes,
        sample_edges,
        issues,
    }
}
