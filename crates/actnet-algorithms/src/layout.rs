//! Two-dimensional node layouts
//!
//! Every layout is deterministic: randomized ones take an explicit seed.

use super::centrality::bfs_distances;
use super::common::{GraphView, NodeIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use thiserror::Error;

/// Smallest distance used by the force model, avoids division blow-ups
const MIN_DISTANCE: f64 = 0.01;
/// Spring layout stops early once the mean displacement drops below this
const SPRING_THRESHOLD: f64 = 1.0e-4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("layout produced a non-finite coordinate for node {0}")]
    NonFinite(NodeIndex),
}

/// A point in the plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Force-directed (Fruchterman-Reingold) layout settings
#[derive(Debug, Clone, Copy)]
pub struct SpringConfig {
    pub iterations: usize,
    /// Optimal node distance; defaults to `1 / sqrt(n)`
    pub k: Option<f64>,
    pub seed: u64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            k: Some(1.0),
            seed: 42,
        }
    }
}

/// Fruchterman-Reingold force-directed layout.
///
/// Attraction along an edge scales with its weight. The result is centered on
/// the origin and scaled so the largest coordinate magnitude is 1.
pub fn spring_layout(view: &GraphView, config: SpringConfig) -> Result<Vec<Position>, LayoutError> {
    let n = view.node_count;
    match n {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![Position::default()]),
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<Position> = (0..n)
        .map(|_| Position::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    let k = config.k.unwrap_or(1.0 / (n as f64).sqrt());
    let extent = |pos: &[Position]| {
        let (min_x, max_x) = pos
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
        let (min_y, max_y) = pos
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        (max_x - min_x).max(max_y - min_y)
    };
    let mut temperature = extent(&pos) * 0.1;
    let cooling = temperature / (config.iterations + 1) as f64;

    for _ in 0..config.iterations {
        let mut displacement = vec![Position::default(); n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / (distance * distance);
                displacement[i].x += dx * force;
                displacement[i].y += dy * force;
            }
            for (&j, &w) in view.neighbors(i).iter().zip(view.weights(i)) {
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = w * distance / k;
                displacement[i].x -= dx * force;
                displacement[i].y -= dy * force;
            }
        }

        let mut moved = 0.0;
        for (p, d) in pos.iter_mut().zip(&displacement) {
            let length = (d.x * d.x + d.y * d.y).sqrt().max(MIN_DISTANCE);
            let step_x = d.x * temperature / length;
            let step_y = d.y * temperature / length;
            p.x += step_x;
            p.y += step_y;
            moved += step_x * step_x + step_y * step_y;
        }

        temperature -= cooling;
        if moved.sqrt() / (n as f64) < SPRING_THRESHOLD {
            break;
        }
    }

    rescale(&mut pos);
    ensure_finite(&pos)?;
    Ok(pos)
}

/// Nodes evenly spaced on the unit circle in index order
pub fn circular_layout(view: &GraphView) -> Vec<Position> {
    let n = view.node_count;
    if n == 1 {
        return vec![Position::default()];
    }
    (0..n)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / n as f64;
            Position::new(theta.cos(), theta.sin())
        })
        .collect()
}

/// Concentric shells grouped by degree, highest degree innermost.
///
/// A single-node innermost shell sits at the center.
pub fn shell_layout(view: &GraphView) -> Vec<Position> {
    let n = view.node_count;
    let mut by_degree: Vec<NodeIndex> = (0..n).collect();
    by_degree.sort_by(|&a, &b| view.degree(b).cmp(&view.degree(a)));

    let mut shells: Vec<Vec<NodeIndex>> = Vec::new();
    for idx in by_degree {
        match shells.last_mut() {
            Some(shell) if view.degree(shell[0]) == view.degree(idx) => shell.push(idx),
            _ => shells.push(vec![idx]),
        }
    }

    place_rings(n, &shells)
}

/// Rings of increasing hop distance from the highest-degree node.
///
/// Nodes unreachable from the root share the outermost ring.
pub fn radial_layout(view: &GraphView) -> Vec<Position> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }

    let mut root = 0;
    for i in 1..n {
        if view.degree(i) > view.degree(root) {
            root = i;
        }
    }

    let distances = bfs_distances(view, root);
    let unreachable_ring = distances.iter().flatten().max().map_or(0, |d| d + 1);
    let mut rings: Vec<Vec<NodeIndex>> = vec![Vec::new(); unreachable_ring + 1];
    for (idx, d) in distances.iter().enumerate() {
        rings[d.unwrap_or(unreachable_ring)].push(idx);
    }
    rings.retain(|ring| !ring.is_empty());

    place_rings(n, &rings)
}

/// Uniform positions in the unit square from a seeded generator
pub fn random_layout(view: &GraphView, seed: u64) -> Vec<Position> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..view.node_count)
        .map(|_| Position::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect()
}

/// Row-major grid placement, `width` nodes per row
pub fn grid_layout(node_count: usize, width: usize) -> Vec<Position> {
    let width = width.max(1);
    (0..node_count)
        .map(|i| Position::new((i % width) as f64, (i / width) as f64))
        .collect()
}

/// Place each ring of nodes on a circle, radius growing by `1 / rings`
fn place_rings(n: usize, rings: &[Vec<NodeIndex>]) -> Vec<Position> {
    let mut pos = vec![Position::default(); n];
    if rings.is_empty() {
        return pos;
    }

    let bump = 1.0 / rings.len() as f64;
    let mut radius = if rings[0].len() == 1 { 0.0 } else { bump };
    let rotate = PI / rings.len() as f64;
    let mut first_theta = rotate;

    for ring in rings {
        let count = ring.len() as f64;
        for (k, &idx) in ring.iter().enumerate() {
            let theta = first_theta + 2.0 * PI * k as f64 / count;
            pos[idx] = Position::new(radius * theta.cos(), radius * theta.sin());
        }
        radius += bump;
        first_theta += rotate;
    }
    pos
}

/// Center on the mean and scale so the largest coordinate magnitude is 1
fn rescale(pos: &mut [Position]) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p.y).sum::<f64>() / n;

    let mut limit: f64 = 0.0;
    for p in pos.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
        limit = limit.max(p.x.abs()).max(p.y.abs());
    }
    if limit > 0.0 {
        for p in pos.iter_mut() {
            p.x /= limit;
            p.y /= limit;
        }
    }
}

fn ensure_finite(pos: &[Position]) -> Result<(), LayoutError> {
    match pos.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
        Some(idx) => Err(LayoutError::NonFinite(idx)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> GraphView {
        GraphView::from_edges(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)])
    }

    #[test]
    fn test_spring_layout_is_reproducible() {
        let view = square();
        let first = spring_layout(&view, SpringConfig::default()).unwrap();
        let second = spring_layout(&view, SpringConfig::default()).unwrap();
        assert_eq!(first, second);

        let max = first.iter().map(|p| p.x.abs().max(p.y.abs())).fold(0.0, f64::max);
        assert!((max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_spring_layout_trivial_sizes() {
        assert!(spring_layout(&GraphView::default(), SpringConfig::default()).unwrap().is_empty());
        let single = GraphView::from_edges(1, &[]);
        assert_eq!(
            spring_layout(&single, SpringConfig::default()).unwrap(),
            vec![Position::default()]
        );
    }

    #[test]
    fn test_circular_layout_on_unit_circle() {
        for p in circular_layout(&square()) {
            assert!(((p.x * p.x + p.y * p.y).sqrt() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_radial_layout_root_at_center() {
        // Star centered on node 2
        let view = GraphView::from_edges(4, &[(2, 0, 1.0), (2, 1, 1.0), (2, 3, 1.0)]);
        let pos = radial_layout(&view);
        assert_eq!(pos[2], Position::default());
        let r = (pos[0].x * pos[0].x + pos[0].y * pos[0].y).sqrt();
        assert!((r - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_shell_layout_groups_by_degree() {
        let view = GraphView::from_edges(4, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)]);
        let pos = shell_layout(&view);
        assert_eq!(pos[0], Position::default());
        let r1 = (pos[1].x.powi(2) + pos[1].y.powi(2)).sqrt();
        let r3 = (pos[3].x.powi(2) + pos[3].y.powi(2)).sqrt();
        assert!((r1 - r3).abs() < 1e-12);
    }

    #[test]
    fn test_random_and_grid_layouts() {
        let view = square();
        assert_eq!(random_layout(&view, 42), random_layout(&view, 42));
        assert!(random_layout(&view, 42).iter().all(|p| (0.0..1.0).contains(&p.x)));

        let grid = grid_layout(12, 10);
        assert_eq!(grid[9], Position::new(9.0, 0.0));
        assert_eq!(grid[11], Position::new(1.0, 1.0));
    }
}
