//! Document type migration engine.
//!
//! Publishing the migration settings node starts a run over the site tree:
//!
//! | Mode | Direction | Nodes touched | Effect |
//! |------|-----------|---------------|--------|
//! | Change type | to new | aliases without the `New` suffix | moved to `<alias>New` |
//! | Change type | to old | aliases with the `New` suffix | moved back to `<alias>` |
//! | Publish only | either | published nodes | republished to refresh the cache |
//!
//! Fields are carried over when the target schema defines the same alias.
//! Every node is handled in its own scope with notifications suppressed, so
//! one node's failure never aborts the batch and republishing never restarts
//! the run.
//!
//! # Example
//!
//! ```ignore
//! use flip_core::{FlipConfig, FlipNotificationHandler, MigrationExecutor};
//!
//! let executor = MigrationExecutor::new(store.clone(), store.clone(), store.clone(), FlipConfig::default());
//! dispatcher.register(Arc::new(FlipNotificationHandler::new(executor)));
//!
//! // Publishing the settings node runs the migration.
//! store.publish(settings_id)?;
//! ```

pub mod config;
pub mod eligibility;
pub mod error;
pub mod executor;
pub mod handler;
pub mod outcome;
pub mod pairing;
pub mod remap;

pub use config::{FlipConfig, MigrationDirection, MigrationMode, MigrationSettings, SettingsFields};
pub use eligibility::is_eligible;
pub use error::MigrationError;
pub use executor::{MigrationExecutor, RunPhase};
pub use handler::FlipNotificationHandler;
pub use outcome::{BatchSummary, BatchTracker, MigrationOutcome, OutcomeKind};
pub use pairing::{SchemaPairing, SuffixPairing, TablePairing};
pub use remap::{property_mappings, remap_fields};
