//! Output formatters for run summaries.

use crate::error::Error;
use clap::ValueEnum;
use flip_core::BatchSummary;

/// Output format for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per run, failures indented below
    Text,
    /// JSON array of summaries
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render the summaries of all runs started by one publish.
pub fn format_summaries(summaries: &[BatchSummary], format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Text => Ok(format_text(summaries)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summaries)?),
    }
}

fn format_text(summaries: &[BatchSummary]) -> String {
    if summaries.is_empty() {
        return "no migration ran".to_string();
    }

    let mut lines = Vec::new();
    for summary in summaries {
        lines.push(summary.to_string());
        for failure in &summary.failures {
            lines.push(format!(
                "  failed {}: {}",
                failure.node_id,
                failure.message.as_deref().unwrap_or("unknown error")
            ));
        }
        if !summary.planned.is_empty() {
            let ids: Vec<String> = summary.planned.iter().map(|id| id.to_string()).collect();
            lines.push(format!("  planned: {}", ids.join(", ")));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flip_core::{BatchTracker, MigrationDirection, MigrationMode};

    fn summary() -> BatchSummary {
        let mut tracker = BatchTracker::new(MigrationMode::ChangeType, MigrationDirection::ToNew);
        tracker.record_changed(1001);
        tracker.record_failed(1002, "content type is locked");
        tracker.snapshot()
    }

    #[test]
    fn test_text_format() {
        let text = format_summaries(&[summary()], OutputFormat::Text).unwrap();
        assert_eq!(
            text,
            "change_type to_new: changed=1 failed=1 skipped=0\n  failed 1002: content type is locked"
        );
    }

    #[test]
    fn test_text_format_empty() {
        assert_eq!(format_summaries(&[], OutputFormat::Text).unwrap(), "no migration ran");
    }

    #[test]
    fn test_json_format() {
        let json = format_summaries(&[summary()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["changed"], 1);
        assert_eq!(value[0]["failures"][0]["node_id"], 1002);
    }

    #[test]
    fn test_planned_nodes_listed() {
        let mut tracker = BatchTracker::new(MigrationMode::PublishOnly, MigrationDirection::ToNew);
        tracker.record_planned(1000);
        tracker.record_planned(1001);
        let text = format_summaries(&[tracker.snapshot()], OutputFormat::Text).unwrap();
        assert!(text.ends_with("  planned: 1000, 1001"), "{text}");
    }
}
