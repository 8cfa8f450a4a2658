//! Network metrics
//!
//! Computes the requested measures over a graph. Measures run in parallel
//! and independently: a failing measure is reported under its own key and
//! does not affect the others. Centralities are unweighted.
//!
//! Fallback policy on disconnected graphs:
//! - closeness is computed on the largest component when it has more than
//!   one node, otherwise it fails
//! - community detection runs on the largest component when it has more
//!   than two nodes, otherwise on the whole graph; fewer than three nodes
//!   in that domain is a failure

pub mod analysis;
pub mod report;

pub use analysis::{compare_networks, connectivity_report, ConnectivityReport, NetworkComparison};
pub use report::{
    CommunityReport, CommunitySummary, ComputedMetrics, MetricResult, MetricsReport, NetworkInfo,
    RankedEntry, RankingReport, TriangleReport,
};

use crate::config::MetricsConfig;
use crate::graph::{NetworkGraph, NodeId};
use actnet_algorithms::{
    betweenness_centrality, closeness_centrality, connected_components, count_triangles,
    degree_centrality, density, eigenvector_centrality, greedy_modularity_communities,
    mean_and_std, triangles_per_node, weighted_modularity, AlgorithmError, Components,
    EigenvectorConfig, GraphView,
};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Error reported for graphs without nodes
pub const EMPTY_NETWORK_MESSAGE: &str = "Network is empty - no connections found";

/// A measure the engine can compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Degree,
    Betweenness,
    Closeness,
    Eigenvector,
    Density,
    Modularity,
    Triangles,
}

impl Measure {
    pub const ALL: [Measure; 7] = [
        Measure::Degree,
        Measure::Betweenness,
        Measure::Closeness,
        Measure::Eigenvector,
        Measure::Density,
        Measure::Modularity,
        Measure::Triangles,
    ];

    /// Key of this measure in a [`MetricsReport`]
    pub fn result_key(&self) -> &'static str {
        match self {
            Measure::Degree => "degree_centrality",
            Measure::Betweenness => "betweenness_centrality",
            Measure::Closeness => "closeness_centrality",
            Measure::Eigenvector => "eigenvector_centrality",
            Measure::Density => "density",
            Measure::Modularity => "modularity",
            Measure::Triangles => "triangles",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.result_key())
    }
}

impl FromStr for Measure {
    type Err = String;

    /// Accepts the short name ("degree") or the result key
    /// ("degree_centrality")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Measure::ALL
            .iter()
            .copied()
            .find(|m| {
                m.result_key() == name
                    || m.result_key().strip_suffix("_centrality") == Some(name.as_str())
            })
            .ok_or_else(|| format!("Unknown measure: {}", s))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("Network too fragmented for closeness centrality")]
    TooFragmented,

    #[error("Network too small for meaningful community detection")]
    TooSmall,

    #[error("Could not converge: {0}")]
    NotConverged(#[from] AlgorithmError),
}

/// Closeness values for every node, zero outside the scope they were
/// computed on
pub(crate) struct ScopedCloseness {
    pub values: Vec<f64>,
    pub members: Vec<usize>,
    pub note: String,
}

pub(crate) fn scoped_closeness(
    view: &GraphView,
    components: &Components,
) -> Result<ScopedCloseness, MeasureError> {
    let n = view.node_count;
    if components.is_connected() {
        return Ok(ScopedCloseness {
            values: closeness_centrality(view),
            members: (0..n).collect(),
            note: "Calculated on full connected network".to_string(),
        });
    }

    let largest = components.largest().unwrap_or(&[]);
    if largest.len() <= 1 {
        return Err(MeasureError::TooFragmented);
    }
    let (sub, mapping) = view.induced(largest);
    let mut values = vec![0.0; n];
    for (local, value) in closeness_centrality(&sub).into_iter().enumerate() {
        values[mapping[local]] = value;
    }
    Ok(ScopedCloseness {
        values,
        members: mapping,
        note: format!("Calculated on largest component ({} of {} nodes)", largest.len(), n),
    })
}

/// Per-graph state shared by all measures of one run
struct AnalysisContext<'a> {
    graph: &'a NetworkGraph,
    view: GraphView,
    components: Components,
}

impl<'a> AnalysisContext<'a> {
    fn new(graph: &'a NetworkGraph) -> Self {
        let view = graph.view();
        let components = connected_components(&view);
        Self {
            graph,
            view,
            components,
        }
    }

    fn label(&self, idx: usize) -> (NodeId, String) {
        match self.graph.node_at(idx) {
            Some(node) => (node.id.clone(), node.label.clone()),
            None => (NodeId::new(idx.to_string()), idx.to_string()),
        }
    }

    fn network_info(&self) -> NetworkInfo {
        let n = self.view.node_count;
        let largest = self.components.largest().map_or(0, |c| c.len());
        NetworkInfo {
            num_nodes: n,
            num_edges: self.view.edge_count(),
            is_connected: self.components.is_connected(),
            num_components: self.components.count(),
            largest_component_size: largest,
            connectivity_ratio: if n > 0 { largest as f64 / n as f64 } else { 0.0 },
        }
    }

    /// Highest values first; ties keep node order
    fn top_entries(&self, values: &[f64], members: &[usize], top_n: usize) -> Vec<RankedEntry> {
        let mut ranked: Vec<(usize, f64)> = members.iter().map(|&i| (i, values[i])).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
            .into_iter()
            .take(top_n)
            .map(|(i, value)| {
                let (id, label) = self.label(i);
                RankedEntry { id, label, value }
            })
            .collect()
    }

    fn ranking(
        &self,
        values: &[f64],
        members: &[usize],
        top_n: usize,
        note: Option<String>,
    ) -> RankingReport {
        let scoped: Vec<f64> = members.iter().map(|&i| values[i]).collect();
        let (average, std) = mean_and_std(&scoped);
        RankingReport {
            top_entries: self.top_entries(values, members, top_n),
            average,
            std,
            note,
        }
    }

    fn all_nodes(&self) -> Vec<usize> {
        (0..self.view.node_count).collect()
    }
}

/// Computes [`MetricsReport`]s with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    fn eigenvector_config(&self) -> EigenvectorConfig {
        EigenvectorConfig {
            max_iterations: self.config.eigenvector_max_iterations,
            tolerance: self.config.eigenvector_tolerance,
        }
    }

    /// Compute `measures` over `graph`. Duplicate requests are computed once.
    pub fn compute(&self, graph: &NetworkGraph, measures: &[Measure]) -> MetricsReport {
        if graph.is_empty() {
            return MetricsReport::NoData {
                error: EMPTY_NETWORK_MESSAGE.to_string(),
            };
        }

        let mut requested: Vec<Measure> = Vec::with_capacity(measures.len());
        for m in measures {
            if !requested.contains(m) {
                requested.push(*m);
            }
        }

        let ctx = AnalysisContext::new(graph);
        let outcomes: Vec<(Measure, MetricResult)> = requested
            .par_iter()
            .map(|&measure| {
                let result = self.compute_measure(&ctx, measure).unwrap_or_else(|e| {
                    warn!("{} failed: {}", measure, e);
                    MetricResult::Error {
                        error: format!("{}: {}", measure.result_key(), e),
                    }
                });
                (measure, result)
            })
            .collect();

        let mut results = IndexMap::with_capacity(outcomes.len());
        for (measure, result) in outcomes {
            results.insert(measure.result_key().to_string(), result);
        }
        debug!("Computed {} measures on {} nodes", results.len(), graph.node_count());

        MetricsReport::Computed(ComputedMetrics {
            network_info: ctx.network_info(),
            results,
        })
    }

    fn compute_measure(
        &self,
        ctx: &AnalysisContext<'_>,
        measure: Measure,
    ) -> Result<MetricResult, MeasureError> {
        let top_n = self.config.top_n;
        let result = match measure {
            Measure::Degree => {
                let values = degree_centrality(&ctx.view);
                MetricResult::Ranking(ctx.ranking(&values, &ctx.all_nodes(), top_n, None))
            }
            Measure::Betweenness => {
                let values = betweenness_centrality(&ctx.view);
                MetricResult::Ranking(ctx.ranking(&values, &ctx.all_nodes(), top_n, None))
            }
            Measure::Closeness => {
                let scoped = scoped_closeness(&ctx.view, &ctx.components)?;
                MetricResult::Ranking(ctx.ranking(
                    &scoped.values,
                    &scoped.members,
                    top_n,
                    Some(scoped.note),
                ))
            }
            Measure::Eigenvector => {
                let values = eigenvector_centrality(&ctx.view, self.eigenvector_config())?;
                MetricResult::Ranking(ctx.ranking(&values, &ctx.all_nodes(), top_n, None))
            }
            Measure::Density => MetricResult::Density {
                value: density(&ctx.view),
            },
            Measure::Modularity => MetricResult::Communities(self.communities(ctx)?),
            Measure::Triangles => {
                let per_node = triangles_per_node(&ctx.view);
                let values: Vec<f64> = per_node.iter().map(|&t| t as f64).collect();
                let (average, _) = mean_and_std(&values);
                MetricResult::Triangles(TriangleReport {
                    total_count: count_triangles(&ctx.view),
                    average_per_node: average,
                    top_entries: ctx.top_entries(&values, &ctx.all_nodes(), top_n),
                })
            }
        };
        Ok(result)
    }

    fn communities(&self, ctx: &AnalysisContext<'_>) -> Result<CommunityReport, MeasureError> {
        let largest = ctx.components.largest().unwrap_or(&[]);
        let (domain, mapping, note) = if !ctx.components.is_connected() && largest.len() > 2 {
            let (sub, mapping) = ctx.view.induced(largest);
            (sub, mapping, "Calculated on largest component")
        } else {
            (ctx.view.clone(), ctx.all_nodes(), "Calculated on full network")
        };
        if domain.node_count <= 2 {
            return Err(MeasureError::TooSmall);
        }

        let communities = greedy_modularity_communities(&domain);
        // Unweighted partition search, frequency-weighted score
        let value = weighted_modularity(&domain, &communities);
        let summaries = communities
            .iter()
            .enumerate()
            .map(|(id, members)| CommunitySummary {
                id,
                size: members.len(),
                members_sample: members
                    .iter()
                    .take(self.config.community_sample_size)
                    .map(|&local| ctx.label(mapping[local]).1)
                    .collect(),
            })
            .collect();

        Ok(CommunityReport {
            value,
            num_communities: communities.len(),
            community_sizes: communities.iter().map(Vec::len).collect(),
            communities: summaries,
            note: note.to_string(),
        })
    }
}

/// Compute `measures` with the default configuration
pub fn compute_metrics(graph: &NetworkGraph, measures: &[Measure]) -> MetricsReport {
    MetricsEngine::default().compute(graph, measures)
}
