//! Content node definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Identifier of a content node.
pub type NodeId = u64;

/// A node in the content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Node identifier (unique within the tree).
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Alias of the node's current schema (document type).
    pub schema_alias: String,
    /// Position among siblings.
    #[serde(default)]
    pub sort_order: i32,
    /// Whether the node is currently published.
    #[serde(default)]
    pub published: bool,
    /// Parent node, `None` for top-level nodes.
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Rendering template.
    #[serde(default)]
    pub template_id: Option<u64>,
    /// Field values keyed by field alias.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl ContentNode {
    /// Create a new unpublished top-level node.
    pub fn new(id: NodeId, name: impl Into<String>, schema_alias: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            schema_alias: schema_alias.into(),
            sort_order: 0,
            published: false,
            parent_id: None,
            template_id: None,
            fields: BTreeMap::new(),
        }
    }

    /// Set the parent node.
    pub fn with_parent(mut self, parent_id: NodeId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the sort order.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Mark the node as published.
    pub fn published(mut self) -> Self {
        self.published = true;
        self
    }

    /// Set the rendering template.
    pub fn with_template(mut self, template_id: u64) -> Self {
        self.template_id = Some(template_id);
        self
    }

    /// Add a field value.
    pub fn with_field(mut self, alias: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(alias.into(), value.into());
        self
    }

    /// Get a field value by alias.
    pub fn field(&self, alias: &str) -> Option<&Value> {
        self.fields.get(alias)
    }

    /// Read a boolean field.
    ///
    /// Accepts JSON booleans as well as the `0`/`1` and `"0"`/`"1"` encodings
    /// that checkbox editors store.
    pub fn bool_field(&self, alias: &str) -> Option<bool> {
        match self.fields.get(alias)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|v| v != 0),
            Value::String(s) => match s.as_str() {
                "1" | "true" => Some(true),
                "0" | "false" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Aliases of all fields set on this node.
    pub fn field_aliases(&self) -> BTreeSet<String> {
        self.fields.keys().cloned().collect()
    }
}
