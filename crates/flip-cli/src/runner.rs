//! Loads a snapshot, publishes a node, and collects the resulting runs.

use crate::config::CliConfig;
use crate::error::Error;
use flip_core::{
    BatchSummary, ContentRepository, ContentSnapshot, FlipNotificationHandler, MemoryContentStore,
    MigrationExecutor, NotificationDispatcher,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Publish the configured node and return the summary of every run it started.
///
/// A settings node whose root cannot be resolved is rejected before anything
/// is published.
pub fn run(config: &CliConfig) -> Result<Vec<BatchSummary>, Error> {
    let snapshot = ContentSnapshot::load(&config.snapshot)?;
    tracing::info!(
        path = %config.snapshot.display(),
        nodes = snapshot.nodes.len(),
        schemas = snapshot.schemas.len(),
        "snapshot loaded"
    );

    let dispatcher = Arc::new(NotificationDispatcher::new());
    let store = Arc::new(MemoryContentStore::from_snapshot(snapshot)?.with_notifications(&dispatcher));
    let executor = MigrationExecutor::new(
        store.clone(),
        store.clone(),
        store.clone(),
        config.flip.clone(),
    );

    let node = store
        .get_by_id(config.publish)?
        .ok_or(flip_core::Error::NodeNotFound(config.publish))?;
    if executor.is_settings_node(&node) {
        executor.resolve_root(&node)?;
    }

    let summaries = Arc::new(Mutex::new(Vec::new()));
    let sink = summaries.clone();
    let handler = FlipNotificationHandler::new(executor)
        .with_summary_sink(move |summary| sink.lock().push(summary.clone()));
    dispatcher.register(Arc::new(handler));
    tracing::debug!(handlers = dispatcher.handler_count(), "migration handler registered");

    tracing::info!(node_id = node.id, node_name = %node.name, alias = %node.schema_alias, "publishing node");
    store.publish(node.id)?;

    if let Some(path) = &config.output {
        if config.flip.dry_run {
            tracing::info!(path = %path.display(), "dry run: writing the unchanged tree");
        }
        store.snapshot().save(path)?;
        tracing::info!(path = %path.display(), "snapshot written");
    }

    let summaries = std::mem::take(&mut *summaries.lock());
    Ok(summaries)
}
