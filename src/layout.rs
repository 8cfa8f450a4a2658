//! Node positions for rendering
//!
//! Layouts are keyed by node id. Every layout is deterministic for a given
//! graph and configuration; a layout failure falls back to a row-major grid.

use crate::config::LayoutConfig;
use crate::graph::{NetworkGraph, NodeId};
use actnet_algorithms::{
    circular_layout, grid_layout, radial_layout, random_layout, shell_layout, spring_layout,
    LayoutError, Position, SpringConfig,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

pub type PositionMap = IndexMap<NodeId, Position>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    /// Force-directed, weighted attraction
    #[default]
    Spring,
    Circular,
    /// Concentric shells by degree
    Shell,
    /// Rings by hop distance from the best-connected node
    Radial,
    Random,
}

impl LayoutAlgorithm {
    /// Parse a layout name; unknown names select the spring layout
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "circular" => LayoutAlgorithm::Circular,
            "shell" => LayoutAlgorithm::Shell,
            "radial" | "hierarchical" => LayoutAlgorithm::Radial,
            "random" => LayoutAlgorithm::Random,
            _ => LayoutAlgorithm::Spring,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutAlgorithm::Spring => "spring",
            LayoutAlgorithm::Circular => "circular",
            LayoutAlgorithm::Shell => "shell",
            LayoutAlgorithm::Radial => "radial",
            LayoutAlgorithm::Random => "random",
        }
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    fn spring_config(&self) -> SpringConfig {
        SpringConfig {
            iterations: self.config.spring_iterations,
            k: Some(self.config.spring_k),
            seed: self.config.seed,
        }
    }

    fn try_layout(
        &self,
        graph: &NetworkGraph,
        algorithm: LayoutAlgorithm,
    ) -> Result<Vec<Position>, LayoutError> {
        let view = graph.view();
        let positions = match algorithm {
            LayoutAlgorithm::Spring => spring_layout(&view, self.spring_config())?,
            LayoutAlgorithm::Circular => circular_layout(&view),
            LayoutAlgorithm::Shell => shell_layout(&view),
            LayoutAlgorithm::Radial => radial_layout(&view),
            LayoutAlgorithm::Random => random_layout(&view, self.config.seed),
        };
        Ok(positions)
    }

    /// Positions for every node of `graph`
    pub fn compute(&self, graph: &NetworkGraph, algorithm: LayoutAlgorithm) -> PositionMap {
        let positions = self.try_layout(graph, algorithm).unwrap_or_else(|e| {
            warn!("{} layout failed, using grid: {}", algorithm, e);
            grid_layout(graph.node_count(), self.config.grid_width)
        });
        graph.node_ids().cloned().zip(positions).collect()
    }
}

/// Layout with the default configuration
pub fn compute_layout(graph: &NetworkGraph, algorithm: LayoutAlgorithm) -> PositionMap {
    LayoutEngine::default().compute(graph, algorithm)
}
