//! Schema (document type) definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A schema governing the fields and template of content nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema identifier.
    pub id: u64,
    /// Schema alias (unique).
    pub alias: String,
    /// Display name.
    pub name: String,
    /// Template assigned to nodes of this schema by default.
    #[serde(default)]
    pub default_template_id: Option<u64>,
    /// Field (property) aliases defined on the schema.
    #[serde(default)]
    pub fields: BTreeSet<String>,
}

impl Schema {
    /// Create a new schema without fields.
    pub fn new(id: u64, alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            alias: alias.into(),
            name: name.into(),
            default_template_id: None,
            fields: BTreeSet::new(),
        }
    }

    /// Add a field alias.
    pub fn with_field(mut self, alias: impl Into<String>) -> Self {
        self.fields.insert(alias.into());
        self
    }

    /// Add multiple field aliases.
    pub fn with_fields<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Set the default template.
    pub fn with_default_template(mut self, template_id: u64) -> Self {
        self.default_template_id = Some(template_id);
        self
    }

    /// Check whether the schema defines a field.
    pub fn has_field(&self, alias: &str) -> bool {
        self.fields.contains(alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder() {
        let schema = Schema::new(31, "pageNew", "Page (new)")
            .with_fields(["title", "body"])
            .with_field("seoTitle")
            .with_default_template(8);

        assert_eq!(schema.fields.len(), 3);
        assert!(schema.has_field("body"));
        assert!(!schema.has_field("legacyField"));
        assert_eq!(schema.default_template_id, Some(8));
    }
}
