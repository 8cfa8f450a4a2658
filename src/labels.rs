//! Label resolution
//!
//! Attaches display names and entity types to every node of a freshly built
//! graph. Individuals are applied first, then organizations (matched by bare
//! id or by the prefixed id), so an organization name wins on collision.
//! Individuals without a usable name, and nodes neither source knows, keep
//! their identifier as label.

use crate::config::LabelConfig;
use crate::fetch::{IndividualRow, LabelSource, OrganizationRow};
use crate::graph::{EntityType, NetworkGraph, NodeId};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// How many nodes each source resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelStats {
    pub individuals: usize,
    pub organizations: usize,
    pub unresolved: usize,
}

/// "First Last" from the non-blank name parts
pub fn individual_label(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let first = first.map(str::trim).filter(|s| !s.is_empty());
    let last = last.map(str::trim).filter(|s| !s.is_empty());
    match (first, last) {
        (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
        (Some(f), None) => Some(f.to_string()),
        (None, Some(l)) => Some(l.to_string()),
        (None, None) => None,
    }
}

pub struct LabelResolver {
    organization_prefix: String,
}

impl LabelResolver {
    pub fn new(config: &LabelConfig) -> Self {
        Self {
            organization_prefix: config.organization_prefix.clone(),
        }
    }

    /// Apply name rows to every node of `graph`
    pub fn apply(
        &self,
        graph: &mut NetworkGraph,
        individuals: &[IndividualRow],
        organizations: &[OrganizationRow],
    ) -> LabelStats {
        let mut stats = LabelStats::default();
        let mut resolved: HashSet<NodeId> = HashSet::new();

        for row in individuals {
            let id = NodeId::new(row.id.trim());
            if let Some(node) = graph.node_mut(&id) {
                // A known individual without a usable name keeps its id as label
                let label = individual_label(row.first_name.as_deref(), row.last_name.as_deref())
                    .unwrap_or_else(|| id.to_string());
                node.resolve(label, EntityType::Individual);
                if resolved.insert(id) {
                    stats.individuals += 1;
                }
            }
        }

        for row in organizations {
            let Some(name) = row.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            let bare = row.id.trim();
            let candidates = [
                NodeId::new(bare),
                NodeId::new(format!("{}{}", self.organization_prefix, bare)),
            ];
            for id in candidates {
                if let Some(node) = graph.node_mut(&id) {
                    node.resolve(name, EntityType::Organization);
                    stats.organizations += 1;
                    resolved.insert(id);
                }
            }
        }

        let ids: Vec<NodeId> = graph.node_ids().cloned().collect();
        for id in ids {
            if resolved.contains(&id) {
                continue;
            }
            if let Some(node) = graph.node_mut(&id) {
                node.resolve(id.as_str(), EntityType::Unknown);
                stats.unresolved += 1;
            }
        }

        debug!(
            "Resolved labels: {} individuals, {} organizations, {} unresolved",
            stats.individuals, stats.organizations, stats.unresolved
        );
        stats
    }

    /// Fetch name rows from `source` and apply them. A failing source is
    /// logged and treated as empty.
    pub async fn resolve<S: LabelSource + ?Sized>(
        &self,
        graph: &mut NetworkGraph,
        source: &S,
    ) -> LabelStats {
        let (individuals, organizations) =
            futures::join!(source.fetch_individuals(), source.fetch_organizations());

        let individuals = individuals.unwrap_or_else(|e| {
            warn!("Could not load individual names: {}", e);
            Vec::new()
        });
        let organizations = organizations.unwrap_or_else(|e| {
            warn!("Could not load organization names: {}", e);
            Vec::new()
        });
        self.apply(graph, &individuals, &organizations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{SourceError, SourceResult};
    use async_trait::async_trait;

    fn person(id: &str, first: Option<&str>, last: Option<&str>) -> IndividualRow {
        IndividualRow {
            id: id.to_string(),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
        }
    }

    fn org(id: &str, name: &str) -> OrganizationRow {
        OrganizationRow {
            id: id.to_string(),
            name: Some(name.to_string()),
        }
    }

    fn graph_with(ids: &[&str]) -> NetworkGraph {
        let mut graph = NetworkGraph::new();
        for id in ids {
            graph.add_node(NodeId::new(*id));
        }
        graph
    }

    #[test]
    fn test_individual_label_parts() {
        assert_eq!(individual_label(Some(" Ana "), Some("Sousa")), Some("Ana Sousa".into()));
        assert_eq!(individual_label(None, Some("Sousa")), Some("Sousa".into()));
        assert_eq!(individual_label(Some(""), Some("  ")), None);
    }

    #[test]
    fn test_apply_labels() {
        let mut graph = graph_with(&["1", "ORG_7", "99"]);
        let resolver = LabelResolver::new(&LabelConfig::default());
        let stats = resolver.apply(
            &mut graph,
            &[person("1", Some("Ana"), Some("Sousa"))],
            &[org("7", "Casa Lopes")],
        );

        let ana = graph.node(&NodeId::new("1")).unwrap();
        assert_eq!(ana.label, "Ana Sousa");
        assert_eq!(ana.entity_type, EntityType::Individual);

        let casa = graph.node(&NodeId::new("ORG_7")).unwrap();
        assert_eq!(casa.label, "Casa Lopes");
        assert_eq!(casa.entity_type, EntityType::Organization);

        let other = graph.node(&NodeId::new("99")).unwrap();
        assert_eq!(other.label, "99");
        assert_eq!(other.entity_type, EntityType::Unknown);
        assert_eq!(
            stats,
            LabelStats {
                individuals: 1,
                organizations: 1,
                unresolved: 1,
            }
        );
    }

    #[test]
    fn test_organization_overrides_individual() {
        let mut graph = graph_with(&["5"]);
        LabelResolver::new(&LabelConfig::default()).apply(
            &mut graph,
            &[person("5", Some("Ana"), None)],
            &[org("5", "Companhia")],
        );
        let node = graph.node(&NodeId::new("5")).unwrap();
        assert_eq!(node.label, "Companhia");
        assert_eq!(node.entity_type, EntityType::Organization);
    }

    struct BrokenNames;

    #[async_trait]
    impl LabelSource for BrokenNames {
        async fn fetch_individuals(&self) -> SourceResult<Vec<IndividualRow>> {
            Err(SourceError::Unavailable("connection reset".into()))
        }

        async fn fetch_organizations(&self) -> SourceResult<Vec<OrganizationRow>> {
            Ok(vec![org("3", "Firma")])
        }
    }

    #[tokio::test]
    async fn test_failed_source_is_skipped() {
        let mut graph = graph_with(&["3", "4"]);
        let stats = LabelResolver::new(&LabelConfig::default())
            .resolve(&mut graph, &BrokenNames)
            .await;

        assert_eq!(stats.organizations, 1);
        assert_eq!(stats.unresolved, 1);
        assert_eq!(graph.node(&NodeId::new("4")).unwrap().label, "4");
    }

    #[test]
    fn test_unnamed_individual_keeps_type() {
        let mut graph = graph_with(&["13", "14"]);
        let stats = LabelResolver::new(&LabelConfig::default()).apply(
            &mut graph,
            &[person("13", None, Some("  "))],
            &[],
        );

        let node = graph.node(&NodeId::new("13")).unwrap();
        assert_eq!(node.label, "13");
        assert_eq!(node.entity_type, EntityType::Individual);
        assert_eq!(
            graph.node(&NodeId::new("14")).unwrap().entity_type,
            EntityType::Unknown
        );
        assert_eq!(
            stats,
            LabelStats {
                individuals: 1,
                organizations: 0,
                unresolved: 1,
            }
        );
    }
}
