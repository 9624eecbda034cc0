//! Per-run outcome accounting.

use super::config::{MigrationDirection, MigrationMode};
use crate::catalog::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What happened to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Schema changed.
    Changed,
    /// Republished.
    Published,
    /// Operation failed.
    Failed,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeKind::Changed => write!(f, "changed"),
            OutcomeKind::Published => write!(f, "published"),
            OutcomeKind::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome recorded for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationOutcome {
    /// The node.
    pub node_id: NodeId,
    /// What happened.
    pub kind: OutcomeKind,
    /// Detail, e.g. the failure reason.
    pub message: Option<String>,
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Run mode.
    pub mode: MigrationMode,
    /// Run direction.
    pub direction: MigrationDirection,
    /// Nodes whose schema changed.
    pub changed: usize,
    /// Nodes republished.
    pub published: usize,
    /// Nodes that failed.
    pub failed: usize,
    /// Nodes skipped because their target schema does not exist.
    pub skipped: usize,
    /// Failure details in the order they occurred.
    pub failures: Vec<MigrationOutcome>,
    /// Nodes a dry run would have processed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub planned: Vec<NodeId>,
}

impl BatchSummary {
    /// Whether any node failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Count of successful operations for the run's mode.
    pub fn succeeded(&self) -> usize {
        match self.mode {
            MigrationMode::ChangeType => self.changed,
            MigrationMode::PublishOnly => self.published,
        }
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mode {
            MigrationMode::ChangeType => write!(
                f,
                "change_type {}: changed={} failed={} skipped={}",
                self.direction, self.changed, self.failed, self.skipped
            )?,
            MigrationMode::PublishOnly => write!(
                f,
                "publish_only: published={} failed={}",
                self.published, self.failed
            )?,
        }
        if !self.planned.is_empty() {
            write!(f, " planned={}", self.planned.len())?;
        }
        Ok(())
    }
}

/// Accumulates node outcomes for a single run.
///
/// A node holds at most one outcome. Failing twice counts once, and a
/// failure after a success replaces the success.
#[derive(Debug)]
pub struct BatchTracker {
    mode: MigrationMode,
    direction: MigrationDirection,
    outcomes: Vec<MigrationOutcome>,
    index: HashMap<NodeId, usize>,
    skipped: Vec<NodeId>,
    planned: Vec<NodeId>,
}

impl BatchTracker {
    /// Create an empty tracker for a run.
    pub fn new(mode: MigrationMode, direction: MigrationDirection) -> Self {
        Self {
            mode,
            direction,
            outcomes: Vec::new(),
            index: HashMap::new(),
            skipped: Vec::new(),
            planned: Vec::new(),
        }
    }

    /// Record a schema change.
    pub fn record_changed(&mut self, node_id: NodeId) -> bool {
        self.record(node_id, OutcomeKind::Changed, None)
    }

    /// Record a republish.
    pub fn record_published(&mut self, node_id: NodeId) -> bool {
        self.record(node_id, OutcomeKind::Published, None)
    }

    /// Record a failure.
    ///
    /// Returns `false` if the node had already failed.
    pub fn record_failed(&mut self, node_id: NodeId, message: impl Into<String>) -> bool {
        self.record(node_id, OutcomeKind::Failed, Some(message.into()))
    }

    /// Record a node skipped for lack of a target schema.
    pub fn record_skipped(&mut self, node_id: NodeId) {
        if !self.index.contains_key(&node_id) && !self.skipped.contains(&node_id) {
            self.skipped.push(node_id);
        }
    }

    /// Record a node a dry run would process.
    pub fn record_planned(&mut self, node_id: NodeId) {
        if !self.planned.contains(&node_id) {
            self.planned.push(node_id);
        }
    }

    fn record(&mut self, node_id: NodeId, kind: OutcomeKind, message: Option<String>) -> bool {
        match self.index.get(&node_id) {
            Some(&idx) => {
                let existing = &mut self.outcomes[idx];
                if kind == OutcomeKind::Failed && existing.kind != OutcomeKind::Failed {
                    existing.kind = OutcomeKind::Failed;
                    existing.message = message;
                    true
                } else {
                    false
                }
            }
            None => {
                self.index.insert(node_id, self.outcomes.len());
                self.outcomes.push(MigrationOutcome {
                    node_id,
                    kind,
                    message,
                });
                true
            }
        }
    }

    /// Number of nodes with the given outcome.
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.outcomes.iter().filter(|o| o.kind == kind).count()
    }

    /// Outcome recorded for a node.
    pub fn outcome(&self, node_id: NodeId) -> Option<&MigrationOutcome> {
        self.index.get(&node_id).map(|&idx| &self.outcomes[idx])
    }

    /// Summarize the run so far.
    pub fn snapshot(&self) -> BatchSummary {
        BatchSummary {
            mode: self.mode,
            direction: self.direction,
            changed: self.count(OutcomeKind::Changed),
            published: self.count(OutcomeKind::Published),
            failed: self.count(OutcomeKind::Failed),
            skipped: self.skipped.len(),
            failures: self
                .outcomes
                .iter()
                .filter(|o| o.kind == OutcomeKind::Failed)
                .cloned()
                .collect(),
            planned: self.planned.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> BatchTracker {
        BatchTracker::new(MigrationMode::ChangeType, MigrationDirection::ToNew)
    }

    #[test]
    fn test_batch_accounting() {
        let mut tracker = tracker();
        for id in 1..=7 {
            tracker.record_changed(id);
        }
        tracker.record_failed(8, "schema changer refused");
        tracker.record_failed(9, "repository unavailable");
        tracker.record_skipped(10);

        let summary = tracker.snapshot();
        assert_eq!(summary.changed, 7);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 1);
        assert!(tracker.outcome(10).is_none());
        assert_eq!(summary.to_string(), "change_type to_new: changed=7 failed=2 skipped=1");
    }

    #[test]
    fn test_failed_twice_counts_once() {
        let mut tracker = tracker();
        assert!(tracker.record_failed(4, "first"));
        assert!(!tracker.record_failed(4, "second"));

        let summary = tracker.snapshot();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].message.as_deref(), Some("first"));
    }

    #[test]
    fn test_failure_replaces_success() {
        let mut tracker = tracker();
        tracker.record_changed(5);
        assert!(tracker.record_failed(5, "late failure"));
        assert!(!tracker.record_changed(5));

        let summary = tracker.snapshot();
        assert_eq!(summary.changed, 0);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_publish_only_summary() {
        let mut tracker = BatchTracker::new(MigrationMode::PublishOnly, MigrationDirection::ToOld);
        tracker.record_published(1);
        tracker.record_published(2);
        tracker.record_published(2);

        let summary = tracker.snapshot();
        assert_eq!(summary.published, 2);
        assert_eq!(summary.succeeded(), 2);
        assert!(!summary.has_failures());
        assert_eq!(summary.to_string(), "publish_only: published=2 failed=0");
    }

    #[test]
    fn test_summary_serializes() {
        let mut tracker = tracker();
        tracker.record_failed(12, "boom");
        let json = serde_json::to_value(tracker.snapshot()).unwrap();
        assert_eq!(json["mode"], "change_type");
        assert_eq!(json["failures"][0]["kind"], "failed");
        assert!(json.get("planned").is_none());
    }
}
