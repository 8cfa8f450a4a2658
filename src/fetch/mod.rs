//! Relation fetching
//!
//! Collaborator traits for the act store, plus the fetcher that runs the six
//! channel queries of a build concurrently. One failing channel never aborts
//! the build; it is logged with its channel index and contributes no rows.

pub mod memory;
pub mod query;

pub use memory::{ActDataset, ActRecord, DatasetError, InMemorySource, Participation};
pub use query::{Channel, ChannelQuery, DateRange, FetchParams, Predicate, QueryShape, Side};

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// One row of a relation channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRelation {
    pub source_id: String,
    pub target_id: String,
    pub date: Option<NaiveDate>,
}

impl RawRelation {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        RawRelation {
            source_id: source_id.into(),
            target_id: target_id.into(),
            date: None,
        }
    }

    pub fn dated(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }
}

/// Individual name row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualRow {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Organization name row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Executes channel queries against the act store
#[async_trait]
pub trait RelationSource: Send + Sync {
    async fn fetch_relations(&self, query: &ChannelQuery) -> SourceResult<Vec<RawRelation>>;
}

/// Supplies display names for node identifiers
#[async_trait]
pub trait LabelSource: Send + Sync {
    async fn fetch_individuals(&self) -> SourceResult<Vec<IndividualRow>>;
    async fn fetch_organizations(&self) -> SourceResult<Vec<OrganizationRow>>;
}

/// A channel that produced no rows because its query failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelFailure {
    pub channel: Channel,
    pub reason: String,
}

impl fmt::Display for ChannelFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.channel, self.reason)
    }
}

/// Rows of every channel in channel order. A failed channel contributes an
/// empty batch, so `batches[i]` always belongs to `Channel::ALL[i]`.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub batches: Vec<Vec<RawRelation>>,
    pub failures: Vec<ChannelFailure>,
}

impl FetchOutcome {
    pub fn row_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}

/// Runs the six channel queries of one build
pub struct RelationFetcher<'a, S: RelationSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: RelationSource + ?Sized> RelationFetcher<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetch all channels concurrently
    pub async fn fetch_all(&self, params: &FetchParams) -> FetchOutcome {
        let queries = ChannelQuery::for_all_channels(params);
        let results = join_all(queries.iter().map(|q| self.source.fetch_relations(q))).await;

        let mut outcome = FetchOutcome::default();
        for (query, result) in queries.iter().zip(results) {
            match result {
                Ok(rows) => {
                    debug!("{} returned {} rows", query.channel, rows.len());
                    outcome.batches.push(rows);
                }
                Err(e) => {
                    warn!("Query {} ({:?}) failed: {}", query.channel.index(), query.channel, e);
                    outcome.batches.push(Vec::new());
                    outcome.failures.push(ChannelFailure {
                        channel: query.channel,
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcome
    }
}
