//! Flip Core - Document type flipping for hierarchical content trees.
//!
//! When a migration settings node is published, every node below the site
//! root is either moved to its paired document type (the "New" variant, or
//! back again on rollback) or republished to refresh the read cache.

pub mod catalog;
pub mod error;
pub mod migration;
pub mod notification;
pub mod storage;

pub use catalog::{ContentNode, NodeId, Schema};
pub use error::Error;
pub use migration::{
    is_eligible, remap_fields, BatchSummary, BatchTracker, FlipConfig, FlipNotificationHandler,
    MigrationDirection, MigrationError, MigrationExecutor, MigrationMode, MigrationOutcome,
    MigrationSettings, OutcomeKind, SchemaPairing, SettingsFields, SuffixPairing, TablePairing,
};
pub use notification::{ContentPublished, NotificationDispatcher, PublishedHandler};
pub use storage::{
    ChangeReport, ContentRepository, ContentSnapshot, CoreScope, MemoryContentStore,
    PropertyMapping, SchemaChange, SchemaChanger, ScopeProvider,
};
