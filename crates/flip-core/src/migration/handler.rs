//! Publish notification handler that starts migration runs.

use super::executor::MigrationExecutor;
use super::outcome::BatchSummary;
use crate::notification::{ContentPublished, PublishedHandler};

type SummarySink = Box<dyn Fn(&BatchSummary) + Send + Sync>;

/// Runs a migration whenever a settings node is published.
///
/// Every other published node is ignored. A run that aborts is logged and
/// the remaining published nodes are still handled.
pub struct FlipNotificationHandler {
    executor: MigrationExecutor,
    summary_sink: Option<SummarySink>,
}

impl FlipNotificationHandler {
    /// Create a handler around an executor.
    pub fn new(executor: MigrationExecutor) -> Self {
        Self {
            executor,
            summary_sink: None,
        }
    }

    /// Pass every run's summary to `sink`.
    pub fn with_summary_sink(
        mut self,
        sink: impl Fn(&BatchSummary) + Send + Sync + 'static,
    ) -> Self {
        self.summary_sink = Some(Box::new(sink));
        self
    }

    /// The wrapped executor.
    pub fn executor(&self) -> &MigrationExecutor {
        &self.executor
    }
}

impl PublishedHandler for FlipNotificationHandler {
    fn handle(&self, notification: &ContentPublished) {
        for node in &notification.published_entities {
            if !self.executor.is_settings_node(node) {
                continue;
            }

            match self.executor.execute(node) {
                Ok(Some(summary)) => {
                    if let Some(sink) = &self.summary_sink {
                        sink(&summary);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        settings_node = node.id,
                        error = %e,
                        "document type migration aborted"
                    );
                }
            }
        }
    }
}
