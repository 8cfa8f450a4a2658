//! Metrics report types
//!
//! Every value here serializes to the JSON shapes consumed by the
//! presentation layer.

use crate::graph::NodeId;
use indexmap::IndexMap;
use serde::Serialize;

/// One row of a ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub id: NodeId,
    pub label: String,
    pub value: f64,
}

/// Top entries of a per-node measure with its distribution summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingReport {
    pub top_entries: Vec<RankedEntry>,
    pub average: f64,
    pub std: f64,
    /// Which part of the network the values were computed on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunitySummary {
    pub id: usize,
    pub size: usize,
    pub members_sample: Vec<String>,
}

/// Greedy modularity partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityReport {
    /// Modularity of the partition
    pub value: f64,
    pub num_communities: usize,
    pub community_sizes: Vec<usize>,
    pub communities: Vec<CommunitySummary>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriangleReport {
    pub total_count: usize,
    pub average_per_node: f64,
    pub top_entries: Vec<RankedEntry>,
}

/// Outcome of one requested measure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricResult {
    Ranking(RankingReport),
    Density { value: f64 },
    Communities(CommunityReport),
    Triangles(TriangleReport),
    Error { error: String },
}

impl MetricResult {
    pub fn as_ranking(&self) -> Option<&RankingReport> {
        match self {
            MetricResult::Ranking(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_communities(&self) -> Option<&CommunityReport> {
        match self {
            MetricResult::Communities(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_triangles(&self) -> Option<&TriangleReport> {
        match self {
            MetricResult::Triangles(t) => Some(t),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MetricResult::Error { error } => Some(error),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }
}

/// Size and connectivity overview, always part of a computed report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInfo {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub is_connected: bool,
    pub num_components: usize,
    pub largest_component_size: usize,
    /// Share of nodes inside the largest component
    pub connectivity_ratio: f64,
}

/// Results keyed by measure result key, in request order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedMetrics {
    pub network_info: NetworkInfo,
    #[serde(flatten)]
    pub results: IndexMap<String, MetricResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricsReport {
    /// The graph had no nodes; nothing was computed
    NoData { error: String },
    Computed(ComputedMetrics),
}

impl MetricsReport {
    pub fn computed(&self) -> Option<&ComputedMetrics> {
        match self {
            MetricsReport::Computed(c) => Some(c),
            MetricsReport::NoData { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MetricsReport::NoData { error } => Some(error),
            MetricsReport::Computed(_) => None,
        }
    }

    /// Result stored under `key`
    pub fn get(&self, key: &str) -> Option<&MetricResult> {
        self.computed().and_then(|c| c.results.get(key))
    }
}
