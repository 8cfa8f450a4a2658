//! Configuration for network construction and analytics
//!
//! Every section has defaults, so an empty YAML document is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub labels: LabelConfig,
    pub metrics: MetricsConfig,
    pub layout: LayoutConfig,
}

/// Label resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Prefix under which organization ids may appear as node ids
    pub organization_prefix: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            organization_prefix: "ORG_".to_string(),
        }
    }
}

/// Metrics engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Entries reported per ranking
    pub top_n: usize,
    /// Power iteration cap for eigenvector centrality
    pub eigenvector_max_iterations: usize,
    pub eigenvector_tolerance: f64,
    /// Member labels sampled per community
    pub community_sample_size: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            eigenvector_max_iterations: 1000,
            eigenvector_tolerance: 1.0e-6,
            community_sample_size: 5,
        }
    }
}

/// Layout engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub spring_iterations: usize,
    pub spring_k: f64,
    pub seed: u64,
    /// Nodes per row of the fallback grid
    pub grid_width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spring_iterations: 50,
            spring_k: 1.0,
            seed: 42,
            grid_width: 10,
        }
    }
}

impl NetworkConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}
