//! Actnet
//!
//! Co-occurrence networks over notarial legal-act records, with network
//! analytics for exploring who dealt with whom.
//!
//! # Architecture
//!
//! - [`fetch`]: six relation channels queried concurrently from a
//!   [`RelationSource`], one row per co-occurrence
//! - [`aggregate`]: rows collapsed into an undirected graph weighted by
//!   co-occurrence frequency
//! - [`labels`]: display names and entity types from a [`LabelSource`]
//! - [`filter`] and [`extract`]: minimum-degree filtering and focal
//!   sub-networks, each producing a new graph
//! - [`metrics`]: centralities, density, communities and triangles, with
//!   per-measure failure isolation
//! - [`layout`] and [`attributes`]: positions and visual encodings for
//!   rendering
//!
//! Graph algorithms live in the `actnet-algorithms` crate.
//!
//! ## Example Usage
//!
//! ```rust
//! use actnet::{aggregate, compute_metrics, filter_by_min_degree, Measure, RawRelation};
//!
//! let rows = vec![
//!     RawRelation::new("1", "2"),
//!     RawRelation::new("2", "1"),
//!     RawRelation::new("2", "3"),
//! ];
//! let graph = aggregate(&[rows]);
//! assert_eq!(graph.edge_count(), 2);
//!
//! let graph = filter_by_min_degree(graph, 1, None);
//! let report = compute_metrics(&graph, &[Measure::Degree, Measure::Density]);
//! assert!(report.get("density").is_some());
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod attributes;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod graph;
pub mod labels;
pub mod layout;
pub mod metrics;
pub mod network;

// Re-export main types for convenience
pub use aggregate::{aggregate, EdgeAggregator};
pub use attributes::{compute_visual_attributes, AttributeMap, NodeAttributes, VisualMeasure};
pub use config::{ConfigError, LabelConfig, LayoutConfig, MetricsConfig, NetworkConfig};
pub use extract::{direct_network, ego_network, focal_summary, FocalSummary};
pub use fetch::{
    ActDataset, ActRecord, Channel, ChannelFailure, ChannelQuery, DatasetError, DateRange,
    FetchParams, InMemorySource, IndividualRow, LabelSource, OrganizationRow, Participation,
    Predicate, QueryShape, RawRelation, RelationFetcher, RelationSource, Side, SourceError,
    SourceResult,
};
pub use filter::{filter_by_min_degree, filter_with_summary, FilterSummary};
pub use graph::{Edge, EntityType, GraphError, GraphResult, NetworkGraph, Node, NodeId};
pub use labels::{LabelResolver, LabelStats};
pub use layout::{compute_layout, LayoutAlgorithm, LayoutEngine, PositionMap};
pub use metrics::{
    compare_networks, compute_metrics, connectivity_report, ConnectivityReport, Measure,
    MeasureError, MetricResult, MetricsEngine, MetricsReport, NetworkComparison, NetworkInfo,
};
pub use network::{NetworkBuild, NetworkBuilder};

pub use actnet_algorithms::Position;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
