//! Community detection algorithms
//!
//! Connected components (union-find) and greedy modularity maximization
//! (Clauset-Newman-Moore) for undirected graphs.

use super::common::{GraphView, NodeIndex};
use std::collections::BTreeMap;

/// Result of the connected components algorithm
#[derive(Debug, Clone)]
pub struct Components {
    /// Component members, ordered by each component's lowest node index
    pub members: Vec<Vec<NodeIndex>>,
    /// Node index -> position in `members`
    pub component_of: Vec<usize>,
}

impl Components {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// A graph is connected when it has exactly one component
    pub fn is_connected(&self) -> bool {
        self.members.len() == 1
    }

    /// The component with the most members; the earliest one wins ties
    pub fn largest(&self) -> Option<&[NodeIndex]> {
        let mut best: Option<&Vec<NodeIndex>> = None;
        for members in &self.members {
            if best.map_or(true, |b| members.len() > b.len()) {
                best = Some(members);
            }
        }
        best.map(|b| b.as_slice())
    }
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]); // Path compression
        }
        self.parent[i]
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Connected components of an undirected graph
pub fn connected_components(view: &GraphView) -> Components {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for u in 0..n {
        for &v in view.neighbors(u) {
            uf.union(u, v);
        }
    }

    // Number components in order of their first node
    let mut root_to_component: Vec<Option<usize>> = vec![None; n];
    let mut members: Vec<Vec<NodeIndex>> = Vec::new();
    let mut component_of = vec![0; n];

    for i in 0..n {
        let root = uf.find(i);
        let component = match root_to_component[root] {
            Some(c) => c,
            None => {
                members.push(Vec::new());
                root_to_component[root] = Some(members.len() - 1);
                members.len() - 1
            }
        };
        members[component].push(i);
        component_of[i] = component;
    }

    Components {
        members,
        component_of,
    }
}

/// Modularity of a partition: `sum_c [ L_c / m - (d_c / 2m)^2 ]`.
///
/// Returns 0.0 for graphs without edges.
pub fn modularity(view: &GraphView, communities: &[Vec<NodeIndex>]) -> f64 {
    let m = view.edge_count() as f64;
    if m == 0.0 {
        return 0.0;
    }

    let mut community_of = vec![usize::MAX; view.node_count];
    for (c, members) in communities.iter().enumerate() {
        for &n in members {
            community_of[n] = c;
        }
    }

    let mut internal = vec![0.0_f64; communities.len()];
    let mut degree_sum = vec![0.0_f64; communities.len()];
    for u in 0..view.node_count {
        let c = community_of[u];
        if c == usize::MAX {
            continue;
        }
        degree_sum[c] += view.degree(u) as f64;
        for &v in view.neighbors(u) {
            if u < v && community_of[v] == c {
                internal[c] += 1.0;
            }
        }
    }

    internal
        .iter()
        .zip(&degree_sum)
        .map(|(l, d)| l / m - (d / (2.0 * m)).powi(2))
        .sum()
}

/// Weighted modularity of a partition: internal edge weight and node
/// strength replace edge counts, with `m` the total edge weight.
///
/// Equals [`modularity`] when every weight is 1. Returns 0.0 when the total
/// weight is zero.
pub fn weighted_modularity(view: &GraphView, communities: &[Vec<NodeIndex>]) -> f64 {
    let m = view.weights.iter().sum::<f64>() / 2.0;
    if m <= 0.0 {
        return 0.0;
    }

    let mut community_of = vec![usize::MAX; view.node_count];
    for (c, members) in communities.iter().enumerate() {
        for &n in members {
            community_of[n] = c;
        }
    }

    let mut internal = vec![0.0_f64; communities.len()];
    let mut strength_sum = vec![0.0_f64; communities.len()];
    for u in 0..view.node_count {
        let c = community_of[u];
        if c == usize::MAX {
            continue;
        }
        for (&v, &w) in view.neighbors(u).iter().zip(view.weights(u)) {
            strength_sum[c] += w;
            if u < v && community_of[v] == c {
                internal[c] += w;
            }
        }
    }

    internal
        .iter()
        .zip(&strength_sum)
        .map(|(l, d)| l / m - (d / (2.0 * m)).powi(2))
        .sum()
}

/// Greedy modularity communities (Clauset-Newman-Moore).
///
/// Starts from singletons and repeatedly merges the pair of adjacent
/// communities with the largest modularity gain until no merge improves
/// modularity. Ties go to the lowest community indices. Communities are
/// returned largest first; members are sorted by node index.
pub fn greedy_modularity_communities(view: &GraphView) -> Vec<Vec<NodeIndex>> {
    let n = view.node_count;
    let m = view.edge_count() as f64;
    let mut communities: Vec<Option<Vec<NodeIndex>>> = (0..n).map(|i| Some(vec![i])).collect();

    if m > 0.0 {
        let q0 = 1.0 / (2.0 * m);
        let mut a: Vec<f64> = (0..n).map(|i| view.degree(i) as f64 * q0).collect();

        // dq[i][j]: modularity change from merging communities i and j
        let mut dq: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        for u in 0..n {
            for &v in view.neighbors(u) {
                dq[u].insert(v, 2.0 * (q0 - a[u] * a[v]));
            }
        }

        loop {
            let mut best: Option<(f64, usize, usize)> = None;
            for (i, row) in dq.iter().enumerate() {
                for (&j, &gain) in row {
                    if i < j && best.map_or(true, |(b, _, _)| gain > b) {
                        best = Some((gain, i, j));
                    }
                }
            }

            let Some((gain, i, j)) = best else { break };
            if gain <= 0.0 {
                break;
            }

            // Merge i into j
            let row_i = std::mem::take(&mut dq[i]);
            let row_j = std::mem::take(&mut dq[j]);
            let mut merged = BTreeMap::new();
            for (&k, &dq_ik) in &row_i {
                if k == j {
                    continue;
                }
                let value = match row_j.get(&k) {
                    Some(&dq_jk) => dq_ik + dq_jk,
                    None => dq_ik - 2.0 * a[j] * a[k],
                };
                merged.insert(k, value);
            }
            for (&k, &dq_jk) in &row_j {
                if k == i || row_i.contains_key(&k) {
                    continue;
                }
                merged.insert(k, dq_jk - 2.0 * a[i] * a[k]);
            }

            for (&k, &value) in &merged {
                dq[k].remove(&i);
                dq[k].insert(j, value);
            }
            dq[j] = merged;

            a[j] += a[i];
            a[i] = 0.0;

            let moved = communities[i].take().unwrap_or_default();
            if let Some(target) = communities[j].as_mut() {
                target.extend(moved);
            }
        }
    }

    let mut result: Vec<Vec<NodeIndex>> = communities
        .into_iter()
        .flatten()
        .map(|mut members| {
            members.sort_unstable();
            members
        })
        .collect();
    result.sort_by(|x, y| y.len().cmp(&x.len()));
    result
}
