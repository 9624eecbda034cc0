//! Content repository error types.

use crate::catalog::NodeId;
use thiserror::Error;

/// Errors raised by the content repository and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// Content node not found.
    #[error("content node {0} not found")]
    NodeNotFound(NodeId),

    /// Schema (document type) not found.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    /// Publishing a node failed.
    #[error("publish failed for node {node_id}: {reason}")]
    Publish {
        /// The node that could not be published.
        node_id: NodeId,
        /// Why publishing failed.
        reason: String,
    },

    /// Scope (transaction) error.
    #[error("scope error: {0}")]
    Scope(String),

    /// Invalid data format.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Snapshot serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Publish {
            node_id: 1204,
            reason: "cache locked".to_string(),
        };
        assert_eq!(err.to_string(), "publish failed for node 1204: cache locked");
        assert_eq!(Error::NodeNotFound(7).to_string(), "content node 7 not found");
    }
}
