//! CLI error types.

use thiserror::Error;

/// Errors reported by the `flip` command.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be loaded, validated or saved.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] flip_core::Error),

    /// The migration cannot run.
    #[error("migration error: {0}")]
    Migration(#[from] flip_core::MigrationError),

    /// Rendering JSON output failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
