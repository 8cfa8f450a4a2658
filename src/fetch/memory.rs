//! In-memory act store
//!
//! Evaluates channel queries over act, participation and name rows held in
//! memory. Used by the command line tool (loaded from a JSON dataset) and by
//! tests.
//!
//! Row semantics:
//! - same-role channels emit each pair of distinct participants once per
//!   act, ordered so that `source_id < target_id`
//! - cross-role channels emit every (first role, second role) combination
//! - acts without a date never match a date filter

use super::query::{ChannelQuery, Predicate, Side};
use super::{
    IndividualRow, LabelSource, OrganizationRow, RawRelation, RelationSource, SourceResult,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error reading dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A notarial act
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActRecord {
    pub act_id: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Goods traded in the act
    #[serde(default)]
    pub goods: Vec<String>,
}

/// An entity taking part in an act under a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participation {
    pub act_id: String,
    pub role: Side,
    pub entity_id: String,
}

/// Serializable contents of an in-memory store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActDataset {
    pub acts: Vec<ActRecord>,
    pub participations: Vec<Participation>,
    pub individuals: Vec<IndividualRow>,
    pub organizations: Vec<OrganizationRow>,
}

impl ActDataset {
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Relation and label source backed by an [`ActDataset`]
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    dataset: ActDataset,
    /// act_id -> participations, in row order
    participants: HashMap<String, Vec<(Side, String)>>,
}

impl InMemorySource {
    pub fn new(dataset: ActDataset) -> Self {
        let mut participants: HashMap<String, Vec<(Side, String)>> = HashMap::new();
        for p in &dataset.participations {
            participants
                .entry(p.act_id.clone())
                .or_default()
                .push((p.role, p.entity_id.clone()));
        }
        Self {
            dataset,
            participants,
        }
    }

    pub fn dataset(&self) -> &ActDataset {
        &self.dataset
    }

    fn act_matches(act: &ActRecord, query: &ChannelQuery) -> bool {
        query.predicates.iter().all(|predicate| match predicate {
            Predicate::Good(good) => act.goods.iter().any(|g| g == good),
            Predicate::Date(range) => act.date.map_or(false, |d| range.contains(d)),
            Predicate::Involves { .. } => true,
        })
    }

    fn row_matches(source: &str, target: &str, query: &ChannelQuery) -> bool {
        query.predicates.iter().all(|predicate| match predicate {
            Predicate::Involves { id, .. } => source == id.as_str() || target == id.as_str(),
            _ => true,
        })
    }

    fn on_side(&self, act_id: &str, side: Side) -> Vec<&str> {
        self.participants
            .get(act_id)
            .map(|rows| {
                rows.iter()
                    .filter(|(role, _)| *role == side)
                    .map(|(_, id)| id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Synchronous evaluation of one channel query
    pub fn evaluate(&self, query: &ChannelQuery) -> Vec<RawRelation> {
        let (source_side, target_side) = query.channel.sides();
        let mut rows = Vec::new();

        for act in &self.dataset.acts {
            if !Self::act_matches(act, query) {
                continue;
            }
            let sources = self.on_side(&act.act_id, source_side);
            let targets = self.on_side(&act.act_id, target_side);

            for &s in &sources {
                for &t in &targets {
                    if query.channel.is_same_side() && s >= t {
                        continue;
                    }
                    if Self::row_matches(s, t, query) {
                        rows.push(RawRelation::new(s, t).dated(act.date));
                    }
                }
            }
        }
        rows
    }
}

#[async_trait]
impl RelationSource for InMemorySource {
    async fn fetch_relations(&self, query: &ChannelQuery) -> SourceResult<Vec<RawRelation>> {
        Ok(self.evaluate(query))
    }
}

#[async_trait]
impl LabelSource for InMemorySource {
    async fn fetch_individuals(&self) -> SourceResult<Vec<IndividualRow>> {
        Ok(self.dataset.individuals.clone())
    }

    async fn fetch_organizations(&self) -> SourceResult<Vec<OrganizationRow>> {
        Ok(self.dataset.organizations.clone())
    }
}
