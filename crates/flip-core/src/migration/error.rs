//! Migration-specific error types.

use crate::catalog::NodeId;
use thiserror::Error;

/// Migration-specific errors.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// An alias has no counterpart under the pairing convention.
    #[error("invalid alias '{alias}': {reason}")]
    InvalidAlias {
        /// The alias that could not be paired.
        alias: String,
        /// Why it could not be paired.
        reason: String,
    },

    /// Neither the root alias nor its new variant was found above the
    /// settings node.
    #[error(
        "no root node of type '{alias}'{} above node {settings_node}",
        or_new_variant(.new_alias)
    )]
    RootNotFound {
        /// The settings node the search started from.
        settings_node: NodeId,
        /// Root alias that was tried first.
        alias: String,
        /// New-variant root alias tried second, if the root alias has one.
        new_alias: Option<String>,
    },

    /// Content repository error.
    #[error("repository error: {0}")]
    Repository(#[from] crate::error::Error),
}

fn or_new_variant(new_alias: &Option<String>) -> String {
    match new_alias {
        Some(alias) => format!(" or '{}'", alias),
        None => String::new(),
    }
}

impl MigrationError {
    pub(crate) fn invalid_alias(alias: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAlias {
            alias: alias.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MigrationError::RootNotFound {
            settings_node: 1500,
            alias: "home".to_string(),
            new_alias: Some("homeNew".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "no root node of type 'home' or 'homeNew' above node 1500"
        );

        let err = MigrationError::RootNotFound {
            settings_node: 1500,
            alias: "home".to_string(),
            new_alias: None,
        };
        assert_eq!(err.to_string(), "no root node of type 'home' above node 1500");

        let err = MigrationError::invalid_alias("ab", "shorter than suffix 'New'");
        assert!(err.to_string().contains("'ab'"));
    }

    #[test]
    fn test_from_repository_error() {
        let err: MigrationError = crate::error::Error::NodeNotFound(3).into();
        assert!(matches!(err, MigrationError::Repository(_)));
    }
}
