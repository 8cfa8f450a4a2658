//! Network node
//!
//! A node is a person or organization that appears in at least one act.

use super::types::{EntityType, NodeId};
use serde::{Deserialize, Serialize};

/// A node in the co-occurrence network
///
/// Nodes have:
/// - An identifier taken from the act records
/// - A display label (the identifier until a label source resolves it)
/// - An entity type tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Identifier, unique within a graph
    pub id: NodeId,

    /// Display label
    pub label: String,

    /// Individual, organization or unknown
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

impl Node {
    /// Create an unresolved node labelled with its own identifier
    pub fn new(id: NodeId) -> Self {
        let label = id.as_str().to_string();
        Node {
            id,
            label,
            entity_type: EntityType::Unknown,
        }
    }

    /// Attach a resolved label and type
    pub fn resolve(&mut self, label: impl Into<String>, entity_type: EntityType) {
        self.label = label.into();
        self.entity_type = entity_type;
    }
}
