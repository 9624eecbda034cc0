//! Content storage interfaces.
//!
//! The flip engine never owns content. It reads and publishes nodes through
//! a [`ContentRepository`], changes their schema through a [`SchemaChanger`],
//! and wraps every per-node write in a scope obtained from a
//! [`ScopeProvider`]. [`MemoryContentStore`] implements all three.

mod memory;
mod snapshot;

pub use memory::MemoryContentStore;
pub use snapshot::ContentSnapshot;

use crate::catalog::{ContentNode, NodeId, Schema};
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Read and publish access to the content tree.
pub trait ContentRepository: Send + Sync {
    /// Get a node by id, whatever its publish status.
    fn get_by_id(&self, id: NodeId) -> Result<Option<ContentNode>, Error>;

    /// Get every descendant of a node, at any depth and publish status.
    ///
    /// The root itself is not included.
    fn get_descendants(&self, root_id: NodeId) -> Result<Vec<ContentNode>, Error>;

    /// Get a schema by alias.
    fn get_schema_by_alias(&self, alias: &str) -> Result<Option<Schema>, Error>;

    /// Save a node and publish it.
    fn save_and_publish(&self, node: &ContentNode) -> Result<(), Error>;
}

/// A unit of work around a single node's write.
///
/// Dropping a scope that was not completed discards its writes. Suppressed
/// notifications resume when the scope is dropped.
pub trait CoreScope {
    /// Stop publish notifications from being delivered while this scope lives.
    fn suppress_notifications(&mut self);

    /// Mark the scope's writes as final.
    fn complete(&mut self);
}

/// Creates scopes.
pub trait ScopeProvider: Send + Sync {
    /// Open a new scope.
    fn create_scope(&self) -> Result<Box<dyn CoreScope + '_>, Error>;
}

/// Applies a schema change to a node.
pub trait SchemaChanger: Send + Sync {
    /// Try to move a node to another schema.
    ///
    /// `Err` means the change could not be attempted; a report with
    /// `success == false` means it was attempted and refused.
    fn try_change_schema(&self, change: &SchemaChange) -> Result<ChangeReport, Error>;
}

/// Where one of a node's properties goes under the target schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMapping {
    /// Alias on the current schema.
    pub alias: String,
    /// Alias on the target schema, `None` if the value is dropped.
    pub new_alias: Option<String>,
}

/// A request to move a node to another schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaChange {
    /// Node being changed.
    pub node_id: NodeId,
    /// Target schema id.
    pub schema_id: u64,
    /// Target schema display name.
    pub schema_name: String,
    /// Template to assign (the target schema's default).
    pub template_id: Option<u64>,
    /// Every property of the node and its target alias.
    pub properties: Vec<PropertyMapping>,
}

impl SchemaChange {
    /// Properties carried over to the target schema.
    pub fn mapped_properties(&self) -> impl Iterator<Item = &PropertyMapping> {
        self.properties.iter().filter(|p| p.new_alias.is_some())
    }

    /// Properties dropped by the change.
    pub fn dropped_properties(&self) -> impl Iterator<Item = &PropertyMapping> {
        self.properties.iter().filter(|p| p.new_alias.is_none())
    }
}

/// Result of an attempted schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    /// Whether the change was applied.
    pub success: bool,
    /// Human-readable detail.
    pub message: String,
}

impl ChangeReport {
    /// A successful change.
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A refused change.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
