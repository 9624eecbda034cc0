//! Migration configuration.
//!
//! [`FlipConfig`] holds the conventions a deployment is built on (aliases,
//! suffix, settings field names). [`MigrationSettings`] is read from the
//! settings node at the start of every run and never changes during it.

use crate::catalog::ContentNode;
use serde::{Deserialize, Serialize};

/// Default suffix marking the new variant of a schema.
pub const DEFAULT_SUFFIX: &str = "New";

/// Default alias of the migration settings schema.
pub const DEFAULT_SETTINGS_ALIAS: &str = "migrationSettings";

/// Default alias of the site root schema.
pub const DEFAULT_ROOT_ALIAS: &str = "home";

/// Direction of a schema migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationDirection {
    /// Move nodes to the new variant.
    ToNew,
    /// Move nodes back to the base schema (rollback).
    ToOld,
}

impl MigrationDirection {
    /// Map the settings checkbox: on means "to new".
    pub fn from_flag(to_new: bool) -> Self {
        if to_new {
            MigrationDirection::ToNew
        } else {
            MigrationDirection::ToOld
        }
    }
}

impl std::fmt::Display for MigrationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationDirection::ToNew => write!(f, "to_new"),
            MigrationDirection::ToOld => write!(f, "to_old"),
        }
    }
}

/// What a run does to eligible nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationMode {
    /// Change each node's schema.
    ChangeType,
    /// Republish published nodes without changing them.
    PublishOnly,
}

impl std::fmt::Display for MigrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationMode::ChangeType => write!(f, "change_type"),
            MigrationMode::PublishOnly => write!(f, "publish_only"),
        }
    }
}

/// Field aliases on the settings node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFields {
    /// Master switch.
    pub enabled: String,
    /// Direction checkbox (on = to new).
    pub direction: String,
    /// Publish-only checkbox.
    pub publish_only: String,
}

impl Default for SettingsFields {
    fn default() -> Self {
        Self {
            enabled: "enableDocumentTypeFlipper".to_string(),
            direction: "migrationType".to_string(),
            publish_only: "publishNodesOnly".to_string(),
        }
    }
}

/// Settings for a single run, read from the settings node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationSettings {
    /// Master switch.
    pub enabled: bool,
    /// Migration direction.
    pub direction: MigrationDirection,
    /// Republish instead of changing schemas.
    pub publish_only: bool,
}

impl MigrationSettings {
    /// Read settings from a node. Missing or unreadable fields are `false`.
    pub fn from_node(node: &ContentNode, fields: &SettingsFields) -> Self {
        let flag = |alias: &str| node.bool_field(alias).unwrap_or(false);
        Self {
            enabled: flag(&fields.enabled),
            direction: MigrationDirection::from_flag(flag(&fields.direction)),
            publish_only: flag(&fields.publish_only),
        }
    }

    /// The mode this run operates in.
    pub fn mode(&self) -> MigrationMode {
        if self.publish_only {
            MigrationMode::PublishOnly
        } else {
            MigrationMode::ChangeType
        }
    }
}

/// Flip engine configuration.
#[derive(Debug, Clone)]
pub struct FlipConfig {
    /// Suffix marking the new variant of a schema.
    pub suffix: String,
    /// Alias of the settings schema whose publication starts a run.
    pub settings_alias: String,
    /// Alias of the site root schema.
    pub root_alias: String,
    /// Field aliases read from the settings node.
    pub settings_fields: SettingsFields,
    /// Log what would happen without publishing or changing anything.
    pub dry_run: bool,
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            settings_alias: DEFAULT_SETTINGS_ALIAS.to_string(),
            root_alias: DEFAULT_ROOT_ALIAS.to_string(),
            settings_fields: SettingsFields::default(),
            dry_run: false,
        }
    }
}

impl FlipConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the new-variant suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the settings schema alias.
    pub fn with_settings_alias(mut self, alias: impl Into<String>) -> Self {
        self.settings_alias = alias.into();
        self
    }

    /// Set the root schema alias.
    pub fn with_root_alias(mut self, alias: impl Into<String>) -> Self {
        self.root_alias = alias.into();
        self
    }

    /// Set the settings field aliases.
    pub fn with_settings_fields(mut self, fields: SettingsFields) -> Self {
        self.settings_fields = fields;
        self
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
