//! Graph topology analysis algorithms
//!
//! Triangle counting, density and clustering coefficients.

use super::common::GraphView;
use std::collections::HashSet;

/// Number of triangles each node participates in
pub fn triangles_per_node(view: &GraphView) -> Vec<usize> {
    let mut triangles = vec![0; view.node_count];

    // For each edge (u, v) with u < v, every common neighbor w > v closes a
    // triangle u < v < w, counted once and credited to all three corners.
    for u in 0..view.node_count {
        let u_neighbors: HashSet<_> = view.neighbors(u).iter().copied().collect();

        for &v in view.neighbors(u) {
            if v <= u {
                continue;
            }
            for &w in view.neighbors(v) {
                if w <= v {
                    continue;
                }
                if u_neighbors.contains(&w) {
                    triangles[u] += 1;
                    triangles[v] += 1;
                    triangles[w] += 1;
                }
            }
        }
    }

    triangles
}

/// Total number of triangles in the graph
pub fn count_triangles(view: &GraphView) -> usize {
    triangles_per_node(view).iter().sum::<usize>() / 3
}

/// Edge density `2m / (n (n - 1))`; 0.0 for fewer than two nodes
pub fn density(view: &GraphView) -> f64 {
    let n = view.node_count as f64;
    if view.node_count <= 1 {
        return 0.0;
    }
    2.0 * view.edge_count() as f64 / (n * (n - 1.0))
}

/// Local clustering coefficient of every node
pub fn clustering(view: &GraphView) -> Vec<f64> {
    triangles_per_node(view)
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let d = view.degree(i) as f64;
            if d < 2.0 {
                0.0
            } else {
                2.0 * t as f64 / (d * (d - 1.0))
            }
        })
        .collect()
}

/// Mean clustering coefficient over all nodes (zeros included)
pub fn average_clustering(view: &GraphView) -> f64 {
    if view.node_count == 0 {
        return 0.0;
    }
    clustering(view).iter().sum::<f64>() / view.node_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(n: usize) -> GraphView {
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j, 1.0));
            }
        }
        GraphView::from_edges(n, &edges)
    }

    #[test]
    fn test_triangle_counting() {
        // Complete graph K4: 4 nodes, all connected.
        // Triangles: (0,1,2), (0,1,3), (0,2,3), (1,2,3) -> 4 triangles.
        let view = complete(4);
        assert_eq!(count_triangles(&view), 4);
        assert_eq!(triangles_per_node(&view), vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_density() {
        assert!((density(&complete(4)) - 1.0).abs() < 1e-12);

        let path = GraphView::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        assert!((density(&path) - 2.0 / 3.0).abs() < 1e-12);

        assert_eq!(density(&GraphView::from_edges(1, &[])), 0.0);
    }

    #[test]
    fn test_average_clustering() {
        // Triangle 0-1-2 plus pendant 3 hanging off node 2
        let view = GraphView::from_edges(4, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0), (2, 3, 1.0)]);
        let c = clustering(&view);
        assert_eq!(c[0], 1.0);
        assert!((c[2] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(c[3], 0.0);
        assert!((average_clustering(&view) - (1.0 + 1.0 + 1.0 / 3.0) / 4.0).abs() < 1e-12);
    }
}
