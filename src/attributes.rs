//! Per-node visual attributes
//!
//! Maps a color measure and a size measure onto every node. Centralities are
//! computed once per call and only when a channel asks for them.

use crate::config::MetricsConfig;
use crate::graph::{EntityType, NetworkGraph, NodeId};
use crate::metrics::scoped_closeness;
use actnet_algorithms::{
    betweenness_centrality, connected_components, degree_centrality, eigenvector_centrality,
    EigenvectorConfig, GraphView,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Quantity a visual channel can encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualMeasure {
    Degree,
    Betweenness,
    Closeness,
    Eigenvector,
    /// Entity type category (colors only)
    Type,
}

impl VisualMeasure {
    /// Parse a channel name; unknown names leave the channel unset
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "degree" => Some(VisualMeasure::Degree),
            "betweenness" => Some(VisualMeasure::Betweenness),
            "closeness" => Some(VisualMeasure::Closeness),
            "eigenvector" => Some(VisualMeasure::Eigenvector),
            "type" => Some(VisualMeasure::Type),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAttributes {
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub degree: usize,
    pub color_value: f64,
    pub size_value: f64,
}

pub type AttributeMap = IndexMap<NodeId, NodeAttributes>;

/// Centrality vectors computed on demand
struct CentralityCache<'a> {
    view: &'a GraphView,
    eigenvector: EigenvectorConfig,
    computed: HashMap<VisualMeasure, Vec<f64>>,
}

impl<'a> CentralityCache<'a> {
    fn values(&mut self, measure: VisualMeasure) -> &[f64] {
        let view = self.view;
        let eigenvector = self.eigenvector;
        self.computed.entry(measure).or_insert_with(|| {
            let n = view.node_count;
            match measure {
                VisualMeasure::Degree | VisualMeasure::Type => degree_centrality(view),
                VisualMeasure::Betweenness => betweenness_centrality(view),
                VisualMeasure::Closeness => {
                    let components = connected_components(view);
                    scoped_closeness(view, &components)
                        .map(|scoped| scoped.values)
                        .unwrap_or_else(|_| vec![0.0; n])
                }
                VisualMeasure::Eigenvector => eigenvector_centrality(view, eigenvector)
                    .unwrap_or_else(|e| {
                        warn!("Eigenvector centrality unavailable for attributes: {}", e);
                        vec![0.0; n]
                    }),
            }
        })
    }
}

/// Visual attributes for every node.
///
/// An unset color maps to 0. An unset size, or a size of `Type`, maps to
/// degree centrality. Closeness outside the largest component and a
/// non-converging eigenvector map to 0.
pub fn compute_visual_attributes(
    graph: &NetworkGraph,
    color: Option<VisualMeasure>,
    size: Option<VisualMeasure>,
    config: &MetricsConfig,
) -> AttributeMap {
    let view = graph.view();
    let mut cache = CentralityCache {
        view: &view,
        eigenvector: EigenvectorConfig {
            max_iterations: config.eigenvector_max_iterations,
            tolerance: config.eigenvector_tolerance,
        },
        computed: HashMap::new(),
    };

    let color_values: Vec<f64> = match color {
        None => vec![0.0; view.node_count],
        Some(VisualMeasure::Type) => graph
            .nodes()
            .map(|n| n.entity_type.category_value())
            .collect(),
        Some(measure) => cache.values(measure).to_vec(),
    };
    let size_values: Vec<f64> = match size {
        Some(measure) if measure != VisualMeasure::Type => cache.values(measure).to_vec(),
        _ => cache.values(VisualMeasure::Degree).to_vec(),
    };

    graph
        .nodes()
        .enumerate()
        .map(|(i, node)| {
            let attributes = NodeAttributes {
                label: node.label.clone(),
                entity_type: node.entity_type,
                degree: view.degree(i),
                color_value: color_values[i],
                size_value: size_values[i],
            };
            (node.id.clone(), attributes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    fn star() -> NetworkGraph {
        let mut graph = NetworkGraph::new();
        for leaf in ["a", "b", "c"] {
            graph.add_edge(id("hub"), id(leaf), 1).unwrap();
        }
        graph
    }

    #[test]
    fn test_defaults_without_measures() {
        let attrs = compute_visual_attributes(&star(), None, None, &MetricsConfig::default());
        let hub = &attrs[&id("hub")];
        assert_eq!(hub.degree, 3);
        assert_eq!(hub.color_value, 0.0);
        assert!((hub.size_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_type_colors() {
        let mut graph = star();
        graph.add_node(id("a")).entity_type = EntityType::Organization;
        let attrs = compute_visual_attributes(
            &graph,
            Some(VisualMeasure::Type),
            Some(VisualMeasure::Type),
            &MetricsConfig::default(),
        );
        assert_eq!(attrs[&id("a")].color_value, 2.0);
        assert_eq!(attrs[&id("b")].color_value, 0.0);
        // Type is not a size measure; degree centrality is used
        assert!((attrs[&id("b")].size_value - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_closeness_zero_outside_largest_component() {
        let mut graph = star();
        graph.add_edge(id("x"), id("y"), 1).unwrap();
        let attrs = compute_visual_attributes(
            &graph,
            Some(VisualMeasure::Closeness),
            Some(VisualMeasure::Betweenness),
            &MetricsConfig::default(),
        );
        assert_eq!(attrs[&id("x")].color_value, 0.0);
        assert!(attrs[&id("hub")].color_value > 0.0);
        assert!(attrs[&id("hub")].size_value > attrs[&id("a")].size_value);
    }

    #[test]
    fn test_eigenvector_failure_maps_to_zero() {
        let config = MetricsConfig {
            eigenvector_max_iterations: 1,
            ..MetricsConfig::default()
        };
        let mut graph = NetworkGraph::new();
        let ids = ["a", "b", "c", "d", "e", "f"];
        for pair in ids.windows(2) {
            graph.add_edge(id(pair[0]), id(pair[1]), 1).unwrap();
        }
        let attrs =
            compute_visual_attributes(&graph, Some(VisualMeasure::Eigenvector), None, &config);
        assert!(attrs.values().all(|a| a.color_value == 0.0));
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(VisualMeasure::from_name("Betweenness"), Some(VisualMeasure::Betweenness));
        assert_eq!(VisualMeasure::from_name("pagerank"), None);
    }
}
