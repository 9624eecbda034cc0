//! JSON snapshots of a content tree.

use crate::catalog::{ContentNode, Schema};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized schemas and nodes of a content tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    /// All schemas.
    #[serde(default)]
    pub schemas: Vec<Schema>,
    /// All content nodes.
    #[serde(default)]
    pub nodes: Vec<ContentNode>,
}

impl ContentSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Add a node.
    pub fn with_node(mut self, node: ContentNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Render the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the snapshot to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Check that ids and aliases are unique and parents exist.
    pub fn validate(&self) -> Result<(), Error> {
        let mut node_ids = std::collections::HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id) {
                return Err(Error::InvalidData(format!("duplicate node id {}", node.id)));
            }
        }
        for node in &self.nodes {
            if let Some(parent) = node.parent_id {
                if !node_ids.contains(&parent) {
                    return Err(Error::InvalidData(format!(
                        "node {} has unknown parent {}",
                        node.id, parent
                    )));
                }
            }
        }

        let mut aliases = std::collections::HashSet::new();
        for schema in &self.schemas {
            if !aliases.insert(schema.alias.as_str()) {
                return Err(Error::InvalidData(format!(
                    "duplicate schema alias '{}'",
                    schema.alias
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let json = r#"{
            "schemas": [{"id": 1, "alias": "home", "name": "Home", "fields": ["title"]}],
            "nodes": [
                {"id": 1000, "name": "Home", "schema_alias": "home", "published": true},
                {"id": 1001, "name": "About", "schema_alias": "page", "parent_id": 1000}
            ]
        }"#;

        let snapshot = ContentSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.schemas.len(), 1);
        assert_eq!(snapshot.nodes[1].parent_id, Some(1000));
    }

    #[test]
    fn test_rejects_unknown_parent() {
        let snapshot = ContentSnapshot::new()
            .with_node(ContentNode::new(2, "Orphan", "page").with_parent(99));
        assert!(matches!(snapshot.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_rejects_duplicate_alias() {
        let snapshot = ContentSnapshot::new()
            .with_schema(Schema::new(1, "page", "Page"))
            .with_schema(Schema::new(2, "page", "Page again"));
        assert!(matches!(snapshot.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        let snapshot = ContentSnapshot::new()
            .with_schema(Schema::new(1, "home", "Home").with_field("title"))
            .with_node(ContentNode::new(1000, "Home", "home").with_field("title", "Welcome"));

        snapshot.save(&path).unwrap();
        let loaded = ContentSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }
}
