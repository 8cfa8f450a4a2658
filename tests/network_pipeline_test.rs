use actnet::{
    aggregate, direct_network, ego_network, filter_by_min_degree, filter_with_summary,
    ActDataset, ActRecord, Channel, ChannelQuery, EntityType, FetchParams, IndividualRow,
    InMemorySource, LabelSource, NetworkBuilder, NetworkConfig, NetworkGraph, NodeId,
    OrganizationRow, Participation, RawRelation, RelationSource, Side, SourceError, SourceResult,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

fn id(s: &str) -> NodeId {
    NodeId::new(s)
}

fn rel(a: &str, b: &str) -> RawRelation {
    RawRelation::new(a, b)
}

fn edge_set(graph: &NetworkGraph) -> HashSet<(String, String, u32)> {
    graph
        .edges()
        .into_iter()
        .map(|e| {
            let (a, b) = if e.source <= e.target {
                (e.source, e.target)
            } else {
                (e.target, e.source)
            };
            (a.to_string(), b.to_string(), e.weight)
        })
        .collect()
}

fn six_channels() -> Vec<Vec<RawRelation>> {
    vec![
        vec![rel("1", "2"), rel("1", "3")],
        vec![rel("4", "5")],
        vec![rel("2", "1"), rel("6", "6")],
        vec![rel("1", "2"), rel("3", "4"), rel("", "9")],
        vec![rel("5", "4"), rel("2", "3")],
        vec![rel("3", "1")],
    ]
}

/// All orderings of `items` (Heap's algorithm)
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.clone());
            return;
        }
        heap(k - 1, items, out);
        for i in 0..k - 1 {
            if k % 2 == 0 {
                items.swap(i, k - 1);
            } else {
                items.swap(0, k - 1);
            }
            heap(k - 1, items, out);
        }
    }
    let mut out = Vec::new();
    heap(items.len(), &mut items.to_vec(), &mut out);
    out
}

#[test]
fn test_aggregation_is_order_independent() {
    let channels = six_channels();
    let reference = aggregate(&channels);

    for permuted in permutations(&channels) {
        let graph = aggregate(&permuted);
        assert_eq!(edge_set(&graph), edge_set(&reference));
        let order: Vec<&NodeId> = graph.node_ids().collect();
        let expected: Vec<&NodeId> = reference.node_ids().collect();
        assert_eq!(order, expected);
    }
}

#[test]
fn test_no_self_loops_or_multi_edges() {
    let graph = aggregate(&six_channels());
    let mut seen = HashSet::new();
    for edge in graph.edges() {
        assert_ne!(edge.source, edge.target);
        let key = if edge.source < edge.target {
            (edge.source.clone(), edge.target.clone())
        } else {
            (edge.target.clone(), edge.source.clone())
        };
        assert!(seen.insert(key), "pair listed twice");
        assert!(edge.weight >= 1);
    }
    assert!(!graph.contains(&id("6")));
    assert!(!graph.contains(&id("9")));
}

#[test]
fn test_weight_counts_both_orientations() {
    let graph = aggregate(&[vec![rel("A", "B"), rel("B", "A"), rel("A", "B")]]);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.weight(&id("A"), &id("B")), Some(3));
}

#[test]
fn test_filter_identity_at_one() {
    let graph = aggregate(&six_channels());
    assert_eq!(filter_by_min_degree(graph.clone(), 1, None), graph);
    assert_eq!(filter_by_min_degree(graph.clone(), 0, None), graph);
}

#[test]
fn test_filter_preserves_isolated_focal() {
    let mut graph = aggregate(&six_channels());
    graph.add_node(id("F"));

    let filtered = filter_by_min_degree(graph, 5, Some(&id("F")));
    assert!(filtered.contains(&id("F")));
}

#[test]
fn test_filter_is_single_pass_not_k_core() {
    // Path a-b-c-d plus triangle b-e-c: degrees a1 b3 c3 d1 e2
    let mut graph = NetworkGraph::new();
    for (a, b) in [("a", "b"), ("b", "c"), ("c", "d"), ("b", "e"), ("e", "c")] {
        graph.add_edge(id(a), id(b), 1).unwrap();
    }

    let (filtered, summary) = filter_with_summary(graph, 3, None);
    // a, d and e go; b and c survive with degree 1 each, below the threshold
    assert_eq!(summary.nodes_removed, 3);
    assert_eq!(filtered.node_count(), 2);
    assert_eq!(filtered.degree(&id("b")), 1);
    assert_eq!(filtered.degree(&id("c")), 1);
}

#[test]
fn test_ego_versus_direct_shape() {
    let mut graph = NetworkGraph::new();
    graph.add_edge(id("F"), id("N1"), 1).unwrap();
    graph.add_edge(id("F"), id("N2"), 2).unwrap();
    graph.add_edge(id("N1"), id("N2"), 1).unwrap();
    graph.add_edge(id("N2"), id("X"), 1).unwrap();

    let ego = ego_network(&graph, &id("F"));
    let direct = direct_network(&graph, &id("F"));

    assert!(ego.has_edge(&id("N1"), &id("N2")));
    assert!(!direct.has_edge(&id("N1"), &id("N2")));
    assert_eq!(direct.weight(&id("F"), &id("N2")), Some(2));
    assert!(!ego.contains(&id("X")));
}

#[test]
fn test_absent_focal_gives_empty_graphs() {
    let graph = aggregate(&six_channels());
    assert_eq!(ego_network(&graph, &id("missing")).node_count(), 0);
    assert_eq!(direct_network(&graph, &id("missing")).node_count(), 0);
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn part(act: &str, role: Side, entity: &str) -> Participation {
    Participation {
        act_id: act.to_string(),
        role,
        entity_id: entity.to_string(),
    }
}

fn act(act_id: &str, date: Option<NaiveDate>, goods: &[&str]) -> ActRecord {
    ActRecord {
        act_id: act_id.to_string(),
        date,
        goods: goods.iter().map(|g| g.to_string()).collect(),
    }
}

fn person(id: &str, first: Option<&str>, last: Option<&str>) -> IndividualRow {
    IndividualRow {
        id: id.to_string(),
        first_name: first.map(String::from),
        last_name: last.map(String::from),
    }
}

fn dataset() -> ActDataset {
    ActDataset {
        acts: vec![
            act("A1", date(1790, 5, 2), &["sugar"]),
            act("A2", date(1802, 1, 9), &["cotton"]),
            act("A3", None, &[]),
        ],
        participations: vec![
            part("A1", Side::Party1, "10"),
            part("A1", Side::Party2, "ORG_3"),
            part("A1", Side::Mention, "11"),
            part("A2", Side::Party1, "10"),
            part("A2", Side::Party2, "12"),
            part("A3", Side::Party1, "12"),
            part("A3", Side::Party1, "13"),
        ],
        individuals: vec![
            person("10", Some("Joana"), Some("Reis")),
            person("11", None, Some("Pereira")),
            person("13", None, None),
        ],
        organizations: vec![OrganizationRow {
            id: "3".into(),
            name: Some("Casa Fonseca".into()),
        }],
    }
}

fn builder() -> NetworkBuilder<InMemorySource> {
    NetworkBuilder::new(Arc::new(InMemorySource::new(dataset())), NetworkConfig::default())
}

#[tokio::test]
async fn test_label_fallback_chain() {
    let builder = builder();
    let graph = builder.build_global(&FetchParams::new()).await;

    assert_eq!(graph.node(&id("10")).unwrap().label, "Joana Reis");
    assert_eq!(graph.node(&id("11")).unwrap().label, "Pereira");
    assert_eq!(graph.node(&id("11")).unwrap().entity_type, EntityType::Individual);

    let org = graph.node(&id("ORG_3")).unwrap();
    assert_eq!(org.label, "Casa Fonseca");
    assert_eq!(org.entity_type, EntityType::Organization);

    // Known individual without a name: id as label, type kept
    let unnamed = graph.node(&id("13")).unwrap();
    assert_eq!(unnamed.label, "13");
    assert_eq!(unnamed.entity_type, EntityType::Individual);

    let unknown = graph.node(&id("12")).unwrap();
    assert_eq!(unknown.label, "12");
    assert_eq!(unknown.entity_type, EntityType::Unknown);
}

#[tokio::test]
async fn test_build_with_good_and_date_filters() {
    let builder = builder();

    let sugar = builder.build_global(&FetchParams::new().with_good("sugar")).await;
    assert_eq!(sugar.node_count(), 3);
    assert_eq!(sugar.edge_count(), 3);

    let range = FetchParams::new().with_dates(date(1800, 1, 1), date(1810, 12, 31));
    let later = builder.build_global(&range).await;
    assert_eq!(later.node_count(), 2);
    assert!(later.has_edge(&id("10"), &id("12")));
}

/// Wraps the in-memory store and fails selected channels
struct FlakySource {
    inner: InMemorySource,
    failing: Vec<Channel>,
}

#[async_trait]
impl RelationSource for FlakySource {
    async fn fetch_relations(&self, query: &ChannelQuery) -> SourceResult<Vec<RawRelation>> {
        if self.failing.contains(&query.channel) {
            return Err(SourceError::Unavailable("timeout".to_string()));
        }
        self.inner.fetch_relations(query).await
    }
}

#[async_trait]
impl LabelSource for FlakySource {
    async fn fetch_individuals(&self) -> SourceResult<Vec<IndividualRow>> {
        Err(SourceError::Unavailable("names table locked".to_string()))
    }

    async fn fetch_organizations(&self) -> SourceResult<Vec<OrganizationRow>> {
        self.inner.fetch_organizations().await
    }
}

#[tokio::test]
async fn test_failed_channel_does_not_abort_build() {
    let source = FlakySource {
        inner: InMemorySource::new(dataset()),
        failing: vec![Channel::Party1Pairs],
    };
    let builder = NetworkBuilder::new(Arc::new(source), NetworkConfig::default());
    let build = builder.build(&FetchParams::new()).await;

    assert_eq!(build.channel_failures.len(), 1);
    assert_eq!(build.channel_failures[0].channel.index(), 1);
    // The party_1 pair 12-13 is gone, the rest of the network is intact
    assert!(!build.graph.contains(&id("13")));
    assert!(build.graph.has_edge(&id("10"), &id("ORG_3")));
    // Individual names failed to load; organizations still resolve
    assert_eq!(build.graph.node(&id("10")).unwrap().label, "10");
    assert_eq!(build.graph.node(&id("ORG_3")).unwrap().label, "Casa Fonseca");
}

#[tokio::test]
async fn test_ego_keeps_params_but_not_focal_restriction() {
    let builder = builder();
    let focal = id("ORG_3");

    let ego = builder.build_ego(&focal, &FetchParams::new().with_focal("12")).await;
    // ORG_3 with neighbors 10 and 11, plus the neighbor edge 10-11
    assert_eq!(ego.node_count(), 3);
    assert!(ego.has_edge(&id("10"), &id("11")));

    let centered = builder.build_centered(&focal, &FetchParams::new()).await;
    assert_eq!(centered.edge_count(), 2);
    assert!(!centered.has_edge(&id("10"), &id("11")));
}
