//! Migration executor - runs a document type migration over the site tree.
//!
//! A run resolves the site root above the settings node, walks the root and
//! all its descendants in sort order, and either republishes or changes the
//! schema of every eligible node. Each node is written in its own scope with
//! notifications suppressed; failures are recorded and the walk continues.

use super::config::{FlipConfig, MigrationDirection, MigrationMode, MigrationSettings};
use super::eligibility::is_eligible;
use super::error::MigrationError;
use super::outcome::{BatchSummary, BatchTracker};
use super::pairing::{SchemaPairing, SuffixPairing};
use super::remap::property_mappings;
use crate::catalog::ContentNode;
use crate::error::Error;
use crate::storage::{ChangeReport, ContentRepository, SchemaChange, SchemaChanger, ScopeProvider};
use std::collections::HashSet;
use std::sync::Arc;

/// Phase of a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// No run in progress.
    Idle,
    /// Looking for the site root.
    ResolvingRoot,
    /// Collecting the nodes to process.
    Traversing,
    /// Republishing a node.
    Publishing,
    /// Changing a node's schema.
    ChangingType,
    /// Reporting results.
    Summarizing,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "idle"),
            RunPhase::ResolvingRoot => write!(f, "resolving_root"),
            RunPhase::Traversing => write!(f, "traversing"),
            RunPhase::Publishing => write!(f, "publishing"),
            RunPhase::ChangingType => write!(f, "changing_type"),
            RunPhase::Summarizing => write!(f, "summarizing"),
        }
    }
}

/// Migration executor - orchestrates a document type migration run.
///
/// The executor keeps no state between runs; every run gets a fresh
/// [`BatchTracker`].
pub struct MigrationExecutor {
    repository: Arc<dyn ContentRepository>,
    scopes: Arc<dyn ScopeProvider>,
    changer: Arc<dyn SchemaChanger>,
    pairing: Arc<dyn SchemaPairing>,
    config: FlipConfig,
}

impl MigrationExecutor {
    /// Create a new executor using suffix pairing from the config.
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        scopes: Arc<dyn ScopeProvider>,
        changer: Arc<dyn SchemaChanger>,
        config: FlipConfig,
    ) -> Self {
        let pairing = Arc::new(SuffixPairing::new(config.suffix.clone()));
        Self {
            repository,
            scopes,
            changer,
            pairing,
            config,
        }
    }

    /// Replace the schema pairing.
    pub fn with_pairing(mut self, pairing: Arc<dyn SchemaPairing>) -> Self {
        self.pairing = pairing;
        self
    }

    /// The executor configuration.
    pub fn config(&self) -> &FlipConfig {
        &self.config
    }

    /// Whether a node is of the settings type.
    pub fn is_settings_node(&self, node: &ContentNode) -> bool {
        node.schema_alias == self.config.settings_alias
    }

    /// Run a migration for a published settings node.
    ///
    /// Returns `Ok(None)` when nothing runs: the node is not a settings node,
    /// no longer exists, or has the flipper switched off.
    pub fn execute(&self, settings_node: &ContentNode) -> Result<Option<BatchSummary>, MigrationError> {
        if !self.is_settings_node(settings_node) {
            return Ok(None);
        }

        // Settings are read from the stored node, not the notification copy.
        let current = match self.repository.get_by_id(settings_node.id)? {
            Some(node) if self.is_settings_node(&node) => node,
            _ => {
                tracing::debug!(node_id = settings_node.id, "settings node no longer available");
                return Ok(None);
            }
        };

        let settings = MigrationSettings::from_node(&current, &self.config.settings_fields);
        if !settings.enabled {
            tracing::debug!(node_id = current.id, "document type flipper disabled");
            return Ok(None);
        }

        self.run(&current, settings).map(Some)
    }

    /// Run a migration with explicit settings.
    pub fn run(
        &self,
        settings_node: &ContentNode,
        settings: MigrationSettings,
    ) -> Result<BatchSummary, MigrationError> {
        let span = tracing::info_span!(
            "flip_run",
            settings_node = settings_node.id,
            mode = %settings.mode(),
            direction = %settings.direction,
            dry_run = self.config.dry_run,
        );
        let _entered = span.enter();

        enter_phase(RunPhase::ResolvingRoot);
        let root = self.resolve_root(settings_node).inspect_err(|e| {
            tracing::error!(error = %e, "could not resolve the root node, nothing migrated");
        })?;

        enter_phase(RunPhase::Traversing);
        let nodes = self.collect_nodes(&root)?;
        tracing::debug!(root = root.id, count = nodes.len(), "collected nodes");

        let mut tracker = BatchTracker::new(settings.mode(), settings.direction);
        for node in &nodes {
            if !is_eligible(
                self.pairing.as_ref(),
                &node.schema_alias,
                settings.direction,
                settings.publish_only,
            ) {
                tracing::trace!(node_id = node.id, alias = %node.schema_alias, "not eligible");
                continue;
            }

            if settings.publish_only {
                self.publish_node(node, &mut tracker);
            } else {
                self.change_node_type(node, settings.direction, &mut tracker);
            }
        }

        enter_phase(RunPhase::Summarizing);
        let summary = tracker.snapshot();
        log_summary(&summary);

        enter_phase(RunPhase::Idle);
        Ok(summary)
    }

    /// Find the site root: the nearest ancestor-or-self of the settings node
    /// with the root alias, or failing that, with its new variant.
    ///
    /// A root alias without a counterpart only matches itself.
    pub fn resolve_root(&self, settings_node: &ContentNode) -> Result<ContentNode, MigrationError> {
        let alias = self.config.root_alias.as_str();
        let chain = self.ancestors_or_self(settings_node)?;

        if let Some(root) = chain.iter().find(|n| n.schema_alias == alias) {
            return Ok(root.clone());
        }

        let new_alias = match self.pairing.paired_alias(alias, MigrationDirection::ToNew) {
            Ok(new_alias) => new_alias,
            Err(e) => {
                tracing::debug!(alias, error = %e, "root alias has no new variant");
                None
            }
        };

        let fallback = new_alias
            .as_deref()
            .and_then(|new_alias| chain.iter().find(|n| n.schema_alias == new_alias))
            .cloned();

        fallback.ok_or_else(|| MigrationError::RootNotFound {
            settings_node: settings_node.id,
            alias: alias.to_string(),
            new_alias,
        })
    }

    fn ancestors_or_self(&self, node: &ContentNode) -> Result<Vec<ContentNode>, MigrationError> {
        let mut chain = vec![node.clone()];
        let mut seen = HashSet::from([node.id]);
        let mut parent = node.parent_id;

        while let Some(id) = parent {
            if !seen.insert(id) {
                break;
            }
            match self.repository.get_by_id(id)? {
                Some(ancestor) => {
                    parent = ancestor.parent_id;
                    chain.push(ancestor);
                }
                None => break,
            }
        }

        Ok(chain)
    }

    /// The root and all its descendants, stable-sorted by sort order.
    pub fn collect_nodes(&self, root: &ContentNode) -> Result<Vec<ContentNode>, MigrationError> {
        let mut nodes = self.repository.get_descendants(root.id)?;
        nodes.insert(0, root.clone());
        nodes.sort_by_key(|n| n.sort_order);
        Ok(nodes)
    }

    fn publish_node(&self, node: &ContentNode, tracker: &mut BatchTracker) {
        if !node.published {
            tracing::trace!(node_id = node.id, "unpublished, left alone");
            return;
        }

        if self.config.dry_run {
            tracing::info!(node_id = node.id, node_name = %node.name, "dry run: would publish node");
            tracker.record_planned(node.id);
            return;
        }

        tracing::trace!(node_id = node.id, phase = %RunPhase::Publishing, "republishing node");
        match self.publish_in_scope(node) {
            Ok(()) => {
                tracing::debug!(node_id = node.id, node_name = %node.name, "published node");
                tracker.record_published(node.id);
            }
            Err(e) => {
                tracing::error!(
                    node_id = node.id,
                    node_name = %node.name,
                    error = %e,
                    "could not publish the content node"
                );
                tracker.record_failed(node.id, format!("node {}: {}", node.id, e));
            }
        }
    }

    fn publish_in_scope(&self, node: &ContentNode) -> Result<(), Error> {
        let mut scope = self.scopes.create_scope()?;
        scope.suppress_notifications();
        self.repository.save_and_publish(node)?;
        scope.complete();
        Ok(())
    }

    fn change_node_type(
        &self,
        node: &ContentNode,
        direction: MigrationDirection,
        tracker: &mut BatchTracker,
    ) {
        tracing::trace!(node_id = node.id, phase = %RunPhase::ChangingType, "changing node type");

        let target_alias = match self.pairing.paired_alias(&node.schema_alias, direction) {
            Ok(Some(alias)) => alias,
            Ok(None) => {
                tracing::warn!(
                    node_id = node.id,
                    alias = %node.schema_alias,
                    direction = %direction,
                    "document type has no counterpart, node skipped"
                );
                tracker.record_skipped(node.id);
                return;
            }
            Err(e) => {
                tracing::error!(node_id = node.id, node_name = %node.name, error = %e, "could not pair the document type");
                tracker.record_failed(node.id, e.to_string());
                return;
            }
        };

        let target = match self.repository.get_schema_by_alias(&target_alias) {
            Ok(Some(schema)) => schema,
            Ok(None) => {
                tracing::warn!(
                    node_id = node.id,
                    alias = %node.schema_alias,
                    target = %target_alias,
                    "could not find a target document type for the alias"
                );
                tracker.record_skipped(node.id);
                return;
            }
            Err(e) => {
                tracing::error!(node_id = node.id, node_name = %node.name, error = %e, "could not load the target document type");
                tracker.record_failed(node.id, format!("node {}: {}", node.id, e));
                return;
            }
        };

        let change = SchemaChange {
            node_id: node.id,
            schema_id: target.id,
            schema_name: target.name.clone(),
            template_id: target.default_template_id,
            properties: property_mappings(node, &target),
        };

        if self.config.dry_run {
            tracing::info!(
                node_id = node.id,
                node_name = %node.name,
                target = %target.name,
                carried = change.mapped_properties().count(),
                dropped = change.dropped_properties().count(),
                "dry run: would change the document type of node"
            );
            tracker.record_planned(node.id);
            return;
        }

        match self.change_in_scope(&change) {
            Ok(report) if report.success => {
                tracing::info!(
                    node_id = node.id,
                    node_name = %node.name,
                    target = %target.name,
                    message = %report.message,
                    "changed the document type of node"
                );
                tracker.record_changed(node.id);
            }
            Ok(report) => {
                tracing::warn!(
                    node_id = node.id,
                    node_name = %node.name,
                    target = %target.name,
                    message = %report.message,
                    "could not change the document type of node"
                );
                tracker.record_failed(node.id, report.message);
            }
            Err(e) => {
                tracing::error!(
                    node_id = node.id,
                    node_name = %node.name,
                    error = %e,
                    "could not change the document type of node"
                );
                tracker.record_failed(node.id, format!("node {}: {}", node.id, e));
            }
        }
    }

    /// A refused change leaves the scope incomplete so its writes roll back.
    fn change_in_scope(&self, change: &SchemaChange) -> Result<ChangeReport, Error> {
        let mut scope = self.scopes.create_scope()?;
        scope.suppress_notifications();
        let report = self.changer.try_change_schema(change)?;
        if report.success {
            scope.complete();
        }
        Ok(report)
    }
}

fn enter_phase(phase: RunPhase) {
    tracing::debug!(phase = %phase, "migration phase");
}

fn log_summary(summary: &BatchSummary) {
    if !summary.planned.is_empty() {
        tracing::info!(planned = summary.planned.len(), "dry run complete, nothing written");
        return;
    }

    match summary.mode {
        MigrationMode::PublishOnly => {
            tracing::info!(count = summary.published, "successfully published nodes");
            if summary.has_failures() {
                tracing::warn!(count = summary.failed, "failed to publish nodes");
            }
        }
        MigrationMode::ChangeType => {
            tracing::info!(
                count = summary.changed,
                skipped = summary.skipped,
                "successfully changed the document type of nodes"
            );
            if summary.has_failures() {
                tracing::warn!(count = summary.failed, "failed to change the document type of nodes");
            }
        }
    }
}
