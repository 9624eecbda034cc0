//! Schema pairing.
//!
//! Every migratable schema exists twice: a base schema and its new variant.
//! A [`SchemaPairing`] knows which aliases are new variants and maps an alias
//! to its counterpart for a given direction.

use super::config::{MigrationDirection, DEFAULT_SUFFIX};
use super::error::MigrationError;
use std::collections::BTreeMap;

/// Maps schema aliases to their counterpart.
pub trait SchemaPairing: Send + Sync {
    /// Whether the alias names a new variant.
    fn is_new_variant(&self, alias: &str) -> bool;

    /// The counterpart alias for the given direction.
    ///
    /// `Ok(None)` means the alias has no counterpart and is not migrated. An
    /// error means the alias is malformed for the convention.
    fn paired_alias(
        &self,
        alias: &str,
        direction: MigrationDirection,
    ) -> Result<Option<String>, MigrationError>;
}

/// Pairs aliases by appending or stripping a fixed suffix.
///
/// `page` and `pageNew` are a pair; `pageNew` is the new variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixPairing {
    suffix: String,
}

impl SuffixPairing {
    /// Create a pairing for the given suffix.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// The suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl Default for SuffixPairing {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIX)
    }
}

impl SchemaPairing for SuffixPairing {
    fn is_new_variant(&self, alias: &str) -> bool {
        alias.len() > self.suffix.len() && alias.ends_with(self.suffix.as_str())
    }

    fn paired_alias(
        &self,
        alias: &str,
        direction: MigrationDirection,
    ) -> Result<Option<String>, MigrationError> {
        if alias.is_empty() {
            return Err(MigrationError::invalid_alias(alias, "alias is empty"));
        }

        match direction {
            MigrationDirection::ToNew => Ok(Some(format!("{}{}", alias, self.suffix))),
            MigrationDirection::ToOld => {
                if alias.len() <= self.suffix.len() {
                    return Err(MigrationError::invalid_alias(
                        alias,
                        format!("not longer than suffix '{}'", self.suffix),
                    ));
                }
                alias
                    .strip_suffix(self.suffix.as_str())
                    .map(|base| Some(base.to_string()))
                    .ok_or_else(|| {
                        MigrationError::invalid_alias(
                            alias,
                            format!("does not end with suffix '{}'", self.suffix),
                        )
                    })
            }
        }
    }
}

/// Pairs aliases through an explicit table of `base -> new` entries.
///
/// Aliases missing from the table have no counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePairing {
    to_new: BTreeMap<String, String>,
    to_old: BTreeMap<String, String>,
}

impl TablePairing {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair.
    pub fn with_pair(mut self, base: impl Into<String>, new_variant: impl Into<String>) -> Self {
        let base = base.into();
        let new_variant = new_variant.into();
        self.to_old.insert(new_variant.clone(), base.clone());
        self.to_new.insert(base, new_variant);
        self
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.to_new.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.to_new.is_empty()
    }
}

impl SchemaPairing for TablePairing {
    fn is_new_variant(&self, alias: &str) -> bool {
        self.to_old.contains_key(alias)
    }

    fn paired_alias(
        &self,
        alias: &str,
        direction: MigrationDirection,
    ) -> Result<Option<String>, MigrationError> {
        let table = match direction {
            MigrationDirection::ToNew => &self.to_new,
            MigrationDirection::ToOld => &self.to_old,
        };
        Ok(table.get(alias).cloned())
    }
}
