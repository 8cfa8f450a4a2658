//! Relation channel query shapes
//!
//! Each channel declares which act roles its two endpoints come from. Filters
//! are attached as predicate values for the query-execution layer to
//! translate; no query text is assembled here.

use crate::graph::NodeId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a person or organization holds within an act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// First contracting party
    #[serde(rename = "party_1")]
    Party1,
    /// Second contracting party
    #[serde(rename = "party_2")]
    Party2,
    /// Third party referenced in the act
    Mention,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Party1 => "party_1",
            Side::Party2 => "party_2",
            Side::Mention => "mention",
        }
    }
}

/// The six co-occurrence channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Party1Pairs,
    Party2Pairs,
    MentionPairs,
    Party1Party2,
    Party1Mention,
    Party2Mention,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Party1Pairs,
        Channel::Party2Pairs,
        Channel::MentionPairs,
        Channel::Party1Party2,
        Channel::Party1Mention,
        Channel::Party2Mention,
    ];

    /// 1-based position, used in diagnostics
    pub fn index(&self) -> usize {
        match self {
            Channel::Party1Pairs => 1,
            Channel::Party2Pairs => 2,
            Channel::MentionPairs => 3,
            Channel::Party1Party2 => 4,
            Channel::Party1Mention => 5,
            Channel::Party2Mention => 6,
        }
    }

    /// Roles of the (source, target) endpoints
    pub fn sides(&self) -> (Side, Side) {
        match self {
            Channel::Party1Pairs => (Side::Party1, Side::Party1),
            Channel::Party2Pairs => (Side::Party2, Side::Party2),
            Channel::MentionPairs => (Side::Mention, Side::Mention),
            Channel::Party1Party2 => (Side::Party1, Side::Party2),
            Channel::Party1Mention => (Side::Party1, Side::Mention),
            Channel::Party2Mention => (Side::Party2, Side::Mention),
        }
    }

    /// Both endpoints come from the same role
    pub fn is_same_side(&self) -> bool {
        let (a, b) = self.sides();
        a == b
    }

    pub fn has_side(&self, side: Side) -> bool {
        let (a, b) = self.sides();
        a == side || b == side
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.sides();
        write!(f, "channel {} ({}-{})", self.index(), a.as_str(), b.as_str())
    }
}

/// Inclusive range of act dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Filters applied to every channel of one network build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    /// Only acts linked to this traded good
    pub good_filter: Option<String>,
    pub date_range: Option<DateRange>,
    /// Only rows where one endpoint is this entity
    pub focal_id: Option<NodeId>,
}

impl FetchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_good(mut self, good: impl Into<String>) -> Self {
        self.good_filter = Some(good.into());
        self
    }

    /// A range is only applied when both bounds are given
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range = match (start, end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            _ => None,
        };
        self
    }

    pub fn with_focal(mut self, focal: impl Into<NodeId>) -> Self {
        self.focal_id = Some(focal.into());
        self
    }

    /// Same filters without the focal restriction
    pub fn without_focal(&self) -> Self {
        FetchParams {
            focal_id: None,
            ..self.clone()
        }
    }
}

/// Which optional filters a channel query carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryShape {
    pub with_good_filter: bool,
    pub with_date_filter: bool,
    pub with_focal_filter: bool,
}

/// A composable restriction on channel rows
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// The act is linked to this good
    Good(String),
    /// The act date falls within the range
    Date(DateRange),
    /// The source endpoint (on `sides.0`) or the target endpoint (on
    /// `sides.1`) is `id`. Only the channel's own sides are listed.
    Involves { id: NodeId, sides: (Side, Side) },
}

/// One parameterized request against a relation channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelQuery {
    pub channel: Channel,
    pub predicates: Vec<Predicate>,
}

impl ChannelQuery {
    /// Build the query for `channel`; unset filters add no predicate at all
    pub fn build(channel: Channel, params: &FetchParams) -> Self {
        let mut predicates = Vec::new();
        if let Some(good) = &params.good_filter {
            predicates.push(Predicate::Good(good.clone()));
        }
        if let Some(range) = params.date_range {
            predicates.push(Predicate::Date(range));
        }
        if let Some(focal) = &params.focal_id {
            predicates.push(Predicate::Involves {
                id: focal.clone(),
                sides: channel.sides(),
            });
        }
        ChannelQuery { channel, predicates }
    }

    /// The six channel queries for one build, in channel order
    pub fn for_all_channels(params: &FetchParams) -> Vec<ChannelQuery> {
        Channel::ALL
            .iter()
            .map(|&channel| ChannelQuery::build(channel, params))
            .collect()
    }

    pub fn shape(&self) -> QueryShape {
        let mut shape = QueryShape::default();
        for predicate in &self.predicates {
            match predicate {
                Predicate::Good(_) => shape.with_good_filter = true,
                Predicate::Date(_) => shape.with_date_filter = true,
                Predicate::Involves { .. } => shape.with_focal_filter = true,
            }
        }
        shape
    }

    pub fn good_filter(&self) -> Option<&str> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Good(good) => Some(good.as_str()),
            _ => None,
        })
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Date(range) => Some(*range),
            _ => None,
        })
    }

    pub fn focal_id(&self) -> Option<&NodeId> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Involves { id, .. } => Some(id),
            _ => None,
        })
    }
}
