//! Co-occurrence network model
//!
//! This module implements the network data model with:
//! - Nodes carrying a display label and an entity type
//! - Undirected edges weighted by co-occurrence frequency
//! - At most one edge per unordered pair and no self-loops

pub mod edge;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use node::Node;
pub use store::{GraphError, GraphResult, NetworkGraph};
pub use types::{EntityType, NodeId};
