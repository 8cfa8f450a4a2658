//! Node centrality measures for undirected graphs
//!
//! All measures treat the graph as unweighted; edge weights record
//! co-occurrence frequency and are not path lengths.

use super::common::{AlgorithmError, GraphView, NodeIndex};
use rayon::prelude::*;
use std::collections::VecDeque;

/// Sources handled per parallel betweenness task. Chunk sums are combined in
/// index order so results do not depend on thread scheduling.
const BETWEENNESS_CHUNK: usize = 64;

/// Power iteration settings for eigenvector centrality
#[derive(Debug, Clone, Copy)]
pub struct EigenvectorConfig {
    /// Maximum number of iterations before giving up
    pub max_iterations: usize,
    /// Per-node convergence tolerance
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1.0e-6,
        }
    }
}

/// Degree centrality: degree divided by `n - 1`.
///
/// A single-node graph scores 1.0.
pub fn degree_centrality(view: &GraphView) -> Vec<f64> {
    let n = view.node_count;
    if n <= 1 {
        return vec![1.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    (0..n).map(|i| view.degree(i) as f64 * scale).collect()
}

/// Betweenness centrality (Brandes), normalized by `(n - 1)(n - 2)`.
///
/// Graphs with two or fewer nodes are left unnormalized.
pub fn betweenness_centrality(view: &GraphView) -> Vec<f64> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }

    let sources: Vec<NodeIndex> = (0..n).collect();
    let partials: Vec<Vec<f64>> = sources
        .par_chunks(BETWEENNESS_CHUNK)
        .map(|chunk| {
            let mut acc = vec![0.0; n];
            for &s in chunk {
                accumulate_dependencies(view, s, &mut acc);
            }
            acc
        })
        .collect();

    let mut betweenness = vec![0.0; n];
    for partial in partials {
        for (b, p) in betweenness.iter_mut().zip(partial) {
            *b += p;
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for b in betweenness.iter_mut() {
            *b *= scale;
        }
    }
    betweenness
}

/// Single-source shortest paths plus dependency accumulation
fn accumulate_dependencies(view: &GraphView, source: NodeIndex, acc: &mut [f64]) {
    let n = view.node_count;
    let mut stack = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut distance = vec![-1_i64; n];
    let mut queue = VecDeque::new();

    sigma[source] = 1.0;
    distance[source] = 0;
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        stack.push(v);
        for &w in view.neighbors(v) {
            if distance[w] < 0 {
                distance[w] = distance[v] + 1;
                queue.push_back(w);
            }
            if distance[w] == distance[v] + 1 {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    let mut delta = vec![0.0_f64; n];
    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
        if w != source {
            acc[w] += delta[w];
        }
    }
}

/// BFS hop distances from `source`; unreachable nodes are `None`
pub fn bfs_distances(view: &GraphView, source: NodeIndex) -> Vec<Option<usize>> {
    let mut distance = vec![None; view.node_count];
    let mut queue = VecDeque::new();
    distance[source] = Some(0);
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let next = distance[v].map_or(0, |d| d + 1);
        for &w in view.neighbors(v) {
            if distance[w].is_none() {
                distance[w] = Some(next);
                queue.push_back(w);
            }
        }
    }
    distance
}

/// Closeness centrality with the Wasserman-Faust correction for nodes that
/// cannot reach the whole graph.
///
/// `c(u) = (r - 1) / sum(d(u, v)) * (r - 1) / (n - 1)` where `r` is the number
/// of nodes reachable from `u` (including `u`). Isolated nodes score 0.
pub fn closeness_centrality(view: &GraphView) -> Vec<f64> {
    let n = view.node_count;
    (0..n)
        .into_par_iter()
        .map(|u| {
            let distances = bfs_distances(view, u);
            let (reachable, total) = distances
                .iter()
                .flatten()
                .fold((0usize, 0usize), |(r, t), d| (r + 1, t + d));

            if total == 0 || n <= 1 {
                return 0.0;
            }
            let reached = (reachable - 1) as f64;
            (reached / total as f64) * (reached / (n - 1) as f64)
        })
        .collect()
}

/// Eigenvector centrality by power iteration on `A + I`.
///
/// The vector is L2-normalized each round. Convergence is declared when the
/// summed absolute change drops below `n * tolerance`.
pub fn eigenvector_centrality(
    view: &GraphView,
    config: EigenvectorConfig,
) -> Result<Vec<f64>, AlgorithmError> {
    let n = view.node_count;
    if n == 0 {
        return Err(AlgorithmError::EmptyGraph);
    }

    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..config.max_iterations {
        let last = x.clone();
        for v in 0..n {
            for &w in view.neighbors(v) {
                x[w] += last[v];
            }
        }

        let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        for v in x.iter_mut() {
            *v /= norm;
        }

        let change: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * config.tolerance {
            return Ok(x);
        }
    }

    Err(AlgorithmError::NotConverged(config.max_iterations))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(leaves: usize) -> GraphView {
        let edges: Vec<_> = (1..=leaves).map(|i| (0, i, 1.0)).collect();
        GraphView::from_edges(leaves + 1, &edges)
    }

    fn path(n: usize) -> GraphView {
        let edges: Vec<_> = (1..n).map(|i| (i - 1, i, 1.0)).collect();
        GraphView::from_edges(n, &edges)
    }

    #[test]
    fn test_degree_centrality() {
        let view = star(4);
        let dc = degree_centrality(&view);
        assert!((dc[0] - 1.0).abs() < 1e-12);
        assert!((dc[1] - 0.25).abs() < 1e-12);

        let single = GraphView::from_edges(1, &[]);
        assert_eq!(degree_centrality(&single), vec![1.0]);
    }

    #[test]
    fn test_betweenness_star_center() {
        let view = star(4);
        let bc = betweenness_centrality(&view);
        // Every leaf pair routes through the center
        assert!((bc[0] - 1.0).abs() < 1e-12);
        for leaf in 1..=4 {
            assert_eq!(bc[leaf], 0.0);
        }
    }

    #[test]
    fn test_betweenness_path() {
        // 0 - 1 - 2: the middle node sits on the single pair path
        let view = path(3);
        let bc = betweenness_centrality(&view);
        assert!((bc[1] - 1.0).abs() < 1e-12);
        assert_eq!(bc[0], 0.0);
    }

    #[test]
    fn test_closeness_path() {
        let view = path(3);
        let cc = closeness_centrality(&view);
        assert!((cc[1] - 1.0).abs() < 1e-12);
        assert!((cc[0] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_closeness_disconnected_scaled() {
        // Edge 0-1 plus isolated 2
        let view = GraphView::from_edges(3, &[(0, 1, 1.0)]);
        let cc = closeness_centrality(&view);
        assert!((cc[0] - 0.5).abs() < 1e-12);
        assert_eq!(cc[2], 0.0);
    }

    #[test]
    fn test_eigenvector_star() {
        let view = star(3);
        let ec = eigenvector_centrality(&view, EigenvectorConfig::default()).unwrap();
        assert!(ec[0] > ec[1]);
        assert!((ec[1] - ec[2]).abs() < 1e-9);
        let norm: f64 = ec.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_eigenvector_not_converged() {
        let view = path(6);
        let config = EigenvectorConfig {
            max_iterations: 1,
            tolerance: 1.0e-12,
        };
        assert_eq!(
            eigenvector_centrality(&view, config),
            Err(AlgorithmError::NotConverged(1))
        );
    }

    #[test]
    fn test_eigenvector_empty() {
        let view = GraphView::default();
        assert_eq!(
            eigenvector_centrality(&view, EigenvectorConfig::default()),
            Err(AlgorithmError::EmptyGraph)
        );
    }
}
