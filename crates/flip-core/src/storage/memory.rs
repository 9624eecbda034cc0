//! In-memory content store.
//!
//! Implements every storage interface over a node map guarded by a
//! `parking_lot` lock. Scopes snapshot the node map when opened and restore
//! it when dropped without being completed.

use super::{
    ChangeReport, ContentRepository, ContentSnapshot, CoreScope, SchemaChange, SchemaChanger,
    ScopeProvider,
};
use crate::catalog::{ContentNode, NodeId, Schema};
use crate::error::Error;
use crate::notification::{ContentPublished, NotificationDispatcher, SuppressionGuard};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::{Arc, Weak};

#[derive(Debug, Default)]
struct StoreState {
    nodes: BTreeMap<NodeId, ContentNode>,
    /// Schemas keyed by alias.
    schemas: BTreeMap<String, Schema>,
}

/// Content store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    state: RwLock<StoreState>,
    /// Weak so that handlers holding the store do not keep the dispatcher
    /// alive in a cycle.
    notifications: Option<Weak<NotificationDispatcher>>,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a snapshot.
    pub fn from_snapshot(snapshot: ContentSnapshot) -> Result<Self, Error> {
        snapshot.validate()?;
        let store = Self::new();
        {
            let mut state = store.state.write();
            for schema in snapshot.schemas {
                state.schemas.insert(schema.alias.clone(), schema);
            }
            for node in snapshot.nodes {
                state.nodes.insert(node.id, node);
            }
        }
        Ok(store)
    }

    /// Deliver publish notifications through the given dispatcher.
    pub fn with_notifications(mut self, dispatcher: &Arc<NotificationDispatcher>) -> Self {
        self.notifications = Some(Arc::downgrade(dispatcher));
        self
    }

    /// Export the current contents.
    pub fn snapshot(&self) -> ContentSnapshot {
        let state = self.state.read();
        ContentSnapshot {
            schemas: state.schemas.values().cloned().collect(),
            nodes: state.nodes.values().cloned().collect(),
        }
    }

    /// Insert or replace a node without publishing it.
    pub fn insert_node(&self, node: ContentNode) {
        self.state.write().nodes.insert(node.id, node);
    }

    /// Insert or replace a schema.
    pub fn insert_schema(&self, schema: Schema) {
        self.state.write().schemas.insert(schema.alias.clone(), schema);
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.state.read().nodes.len()
    }

    /// Publish an existing node by id.
    pub fn publish(&self, id: NodeId) -> Result<(), Error> {
        let node = self.get_by_id(id)?.ok_or(Error::NodeNotFound(id))?;
        self.save_and_publish(&node)
    }

    fn dispatcher(&self) -> Option<Arc<NotificationDispatcher>> {
        self.notifications.as_ref().and_then(Weak::upgrade)
    }
}

impl ContentRepository for MemoryContentStore {
    fn get_by_id(&self, id: NodeId) -> Result<Option<ContentNode>, Error> {
        Ok(self.state.read().nodes.get(&id).cloned())
    }

    fn get_descendants(&self, root_id: NodeId) -> Result<Vec<ContentNode>, Error> {
        let state = self.state.read();
        if !state.nodes.contains_key(&root_id) {
            return Err(Error::NodeNotFound(root_id));
        }

        let mut descendants = Vec::new();
        let mut visited = HashSet::from([root_id]);
        let mut queue = VecDeque::from([root_id]);

        while let Some(parent) = queue.pop_front() {
            let mut children: Vec<&ContentNode> = state
                .nodes
                .values()
                .filter(|n| n.parent_id == Some(parent))
                .collect();
            children.sort_by_key(|n| (n.sort_order, n.id));

            for child in children {
                if visited.insert(child.id) {
                    queue.push_back(child.id);
                    descendants.push(child.clone());
                }
            }
        }

        Ok(descendants)
    }

    fn get_schema_by_alias(&self, alias: &str) -> Result<Option<Schema>, Error> {
        Ok(self.state.read().schemas.get(alias).cloned())
    }

    fn save_and_publish(&self, node: &ContentNode) -> Result<(), Error> {
        let mut published = node.clone();
        published.published = true;

        {
            let mut state = self.state.write();
            if let Some(parent) = published.parent_id {
                if !state.nodes.contains_key(&parent) {
                    return Err(Error::NodeNotFound(parent));
                }
            }
            state.nodes.insert(published.id, published.clone());
        }

        // The lock is released first: handlers read the store.
        if let Some(dispatcher) = self.dispatcher() {
            dispatcher.publish(&ContentPublished::new(vec![published]));
        }
        Ok(())
    }
}

impl ScopeProvider for MemoryContentStore {
    fn create_scope(&self) -> Result<Box<dyn CoreScope + '_>, Error> {
        let saved_nodes = self.state.read().nodes.clone();
        Ok(Box::new(MemoryScope {
            store: self,
            saved_nodes,
            completed: false,
            suppression: None,
        }))
    }
}

impl SchemaChanger for MemoryContentStore {
    fn try_change_schema(&self, change: &SchemaChange) -> Result<ChangeReport, Error> {
        let mut state = self.state.write();

        let schema = match state.schemas.values().find(|s| s.id == change.schema_id) {
            Some(schema) => schema.clone(),
            None => {
                return Ok(ChangeReport::failed(format!(
                    "no schema with id {}",
                    change.schema_id
                )))
            }
        };

        for mapping in change.mapped_properties() {
            if let Some(new_alias) = &mapping.new_alias {
                if !schema.has_field(new_alias) {
                    return Ok(ChangeReport::failed(format!(
                        "property '{}' does not exist on '{}'",
                        new_alias, schema.alias
                    )));
                }
            }
        }

        let node = state
            .nodes
            .get_mut(&change.node_id)
            .ok_or(Error::NodeNotFound(change.node_id))?;

        let mut fields = BTreeMap::new();
        for mapping in &change.properties {
            let Some(new_alias) = &mapping.new_alias else {
                continue;
            };
            if let Some(value) = node.fields.get(&mapping.alias) {
                fields.insert(new_alias.clone(), value.clone());
            }
        }

        let carried = fields.len();
        let dropped = node.fields.len().saturating_sub(carried);
        node.fields = fields;
        node.schema_alias = schema.alias;
        node.template_id = change.template_id;

        Ok(ChangeReport::succeeded(format!(
            "{} properties carried over, {} dropped",
            carried, dropped
        )))
    }
}

struct MemoryScope<'a> {
    store: &'a MemoryContentStore,
    saved_nodes: BTreeMap<NodeId, ContentNode>,
    completed: bool,
    suppression: Option<SuppressionGuard>,
}

impl CoreScope for MemoryScope<'_> {
    fn suppress_notifications(&mut self) {
        if self.suppression.is_none() {
            self.suppression = self.store.dispatcher().map(|d| d.suppress());
        }
    }

    fn complete(&mut self) {
        self.completed = true;
    }
}

impl Drop for MemoryScope<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.store.state.write().nodes = std::mem::take(&mut self.saved_nodes);
            tracing::debug!("scope rolled back");
        }
    }
}
