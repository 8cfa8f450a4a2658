//! Network construction
//!
//! A build fetches the six relation channels concurrently, aggregates their
//! rows into a weighted graph and resolves labels. Every build produces a
//! fresh graph owned by the caller.

use crate::aggregate::aggregate;
use crate::config::NetworkConfig;
use crate::extract::{direct_network, ego_network};
use crate::filter::filter_by_min_degree;
use crate::fetch::{ChannelFailure, FetchParams, LabelSource, RelationFetcher, RelationSource};
use crate::graph::{NetworkGraph, NodeId};
use crate::labels::{LabelResolver, LabelStats};
use crate::metrics::{compare_networks, NetworkComparison};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// A built graph with the diagnostics of its build
#[derive(Debug, Clone, Serialize)]
pub struct NetworkBuild {
    pub graph: NetworkGraph,
    /// Channels that contributed no rows because their query failed
    pub channel_failures: Vec<ChannelFailure>,
    pub labels: LabelStats,
}

/// Builds networks from a relation and label source
pub struct NetworkBuilder<S: RelationSource + LabelSource> {
    source: Arc<S>,
    config: NetworkConfig,
}

impl<S: RelationSource + LabelSource> NetworkBuilder<S> {
    pub fn new(source: Arc<S>, config: NetworkConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Fetch, aggregate and label, keeping the build diagnostics
    pub async fn build(&self, params: &FetchParams) -> NetworkBuild {
        let outcome = RelationFetcher::new(self.source.as_ref()).fetch_all(params).await;
        if !outcome.failures.is_empty() {
            warn!(
                "{} of 6 relation channels failed; building from the rest",
                outcome.failures.len()
            );
        }

        let mut graph = aggregate(&outcome.batches);
        let labels = LabelResolver::new(&self.config.labels)
            .resolve(&mut graph, self.source.as_ref())
            .await;

        info!(
            "Built network from {} rows: {} nodes, {} edges",
            outcome.row_count(),
            graph.node_count(),
            graph.edge_count()
        );
        NetworkBuild {
            graph,
            channel_failures: outcome.failures,
            labels,
        }
    }

    /// Co-occurrence network over all entities matching `params`
    pub async fn build_global(&self, params: &FetchParams) -> NetworkGraph {
        self.build(params).await.graph
    }

    /// Ego network of `focal` within the global network for `params`.
    /// Any focal id already set in `params` is ignored.
    pub async fn build_ego(&self, focal: &NodeId, params: &FetchParams) -> NetworkGraph {
        let global = self.build_global(&params.without_focal()).await;
        ego_network(&global, focal)
    }

    /// Direct-connection star of `focal` within the global network
    pub async fn build_direct(&self, focal: &NodeId, params: &FetchParams) -> NetworkGraph {
        let global = self.build_global(&params.without_focal()).await;
        direct_network(&global, focal)
    }

    /// Network built only from rows that involve `focal`
    pub async fn build_centered(&self, focal: &NodeId, params: &FetchParams) -> NetworkGraph {
        let params = params.without_focal().with_focal(focal.clone());
        self.build_global(&params).await
    }

    /// Build two global networks, filter both at `min_degree` and compare them
    pub async fn compare(
        &self,
        first: (&str, &FetchParams),
        second: (&str, &FetchParams),
        min_degree: usize,
    ) -> NetworkComparison {
        let (a, b) = futures::join!(self.build_global(first.1), self.build_global(second.1));
        let a = filter_by_min_degree(a, min_degree, None);
        let b = filter_by_min_degree(b, min_degree, None);
        compare_networks(&a, first.0, &b, second.0)
    }
}
