//! Edge aggregation
//!
//! Collapses the rows of every channel into one undirected weighted graph.
//! Each row contributes 1 to the weight of its unordered endpoint pair; rows
//! with a blank endpoint or with identical endpoints are dropped.

use crate::fetch::RawRelation;
use crate::graph::{NetworkGraph, NodeId};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

/// Counts co-occurrences per unordered pair
#[derive(Debug, Default)]
pub struct EdgeAggregator {
    counts: FxHashMap<(String, String), u32>,
    skipped_null: usize,
    skipped_self: usize,
}

impl EdgeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, relation: &RawRelation) {
        let a = relation.source_id.trim();
        let b = relation.target_id.trim();
        if a.is_empty() || b.is_empty() {
            self.skipped_null += 1;
            return;
        }
        if a == b {
            self.skipped_self += 1;
            return;
        }
        let key = if a < b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn extend<'a>(&mut self, relations: impl IntoIterator<Item = &'a RawRelation>) {
        for relation in relations {
            self.add(relation);
        }
    }

    pub fn pair_count(&self) -> usize {
        self.counts.len()
    }

    /// Weighted pairs sorted by endpoints, so the result does not depend on
    /// the order rows arrived in
    pub fn weighted_pairs(&self) -> Vec<(NodeId, NodeId, u32)> {
        let mut pairs: Vec<_> = self
            .counts
            .iter()
            .map(|((a, b), &w)| (NodeId::new(a.as_str()), NodeId::new(b.as_str()), w))
            .collect();
        pairs.sort();
        pairs
    }

    pub fn into_graph(self) -> NetworkGraph {
        let mut graph = NetworkGraph::new();
        for (a, b, weight) in self.weighted_pairs() {
            // Keys are distinct ordered pairs with a != b and weight >= 1
            if let Err(e) = graph.add_edge(a, b, weight) {
                debug!("Skipping pair: {}", e);
            }
        }
        if self.skipped_null > 0 || self.skipped_self > 0 {
            debug!(
                "Dropped {} rows with a blank endpoint and {} self-pairs",
                self.skipped_null, self.skipped_self
            );
        }
        info!(
            "Aggregated network: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }
}

/// Build the weighted graph for a set of channel batches
pub fn aggregate(batches: &[Vec<RawRelation>]) -> NetworkGraph {
    let mut aggregator = EdgeAggregator::new();
    for batch in batches {
        aggregator.extend(batch);
    }
    aggregator.into_graph()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(a: &str, b: &str) -> RawRelation {
        RawRelation::new(a, b)
    }

    #[test]
    fn test_weights_sum_across_channels() {
        let batches = vec![
            vec![rel("a", "b"), rel("a", "c")],
            vec![rel("b", "a")],
            vec![rel("a", "b")],
        ];
        let graph = aggregate(&batches);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.weight(&NodeId::new("a"), &NodeId::new("b")), Some(3));
        assert_eq!(graph.weight(&NodeId::new("c"), &NodeId::new("a")), Some(1));
    }

    #[test]
    fn test_blank_and_self_rows_dropped() {
        let batches = vec![vec![rel("a", "a"), rel("", "b"), rel("  ", "c"), rel("x", "y")]];
        let graph = aggregate(&batches);

        assert_eq!(graph.node_count(), 2);
        assert!(!graph.contains(&NodeId::new("a")));
        assert!(!graph.contains(&NodeId::new("b")));
    }

    #[test]
    fn test_order_independent() {
        let rows = vec![rel("c", "a"), rel("b", "c"), rel("a", "b"), rel("c", "b")];
        let mut reversed = rows.clone();
        reversed.reverse();

        let g1 = aggregate(&[rows]);
        let g2 = aggregate(&[reversed]);
        assert_eq!(g1, g2);
        let order: Vec<&str> = g1.node_ids().map(|id| id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
