//! Command-line configuration.

use crate::formatter::OutputFormat;
use clap::Parser;
use flip_core::migration::config::{DEFAULT_ROOT_ALIAS, DEFAULT_SETTINGS_ALIAS, DEFAULT_SUFFIX};
use flip_core::{FlipConfig, NodeId};
use std::path::PathBuf;

/// Configuration for one invocation of `flip`.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Snapshot to load.
    pub snapshot: PathBuf,
    /// Node to publish.
    pub publish: NodeId,
    /// Summary format.
    pub format: OutputFormat,
    /// Where to write the resulting tree, if anywhere.
    pub output: Option<PathBuf>,
    /// Engine configuration.
    pub flip: FlipConfig,
}

impl CliConfig {
    /// Create a configuration with default engine settings.
    pub fn new(snapshot: impl Into<PathBuf>, publish: NodeId) -> Self {
        Self {
            snapshot: snapshot.into(),
            publish,
            format: OutputFormat::Text,
            output: None,
            flip: FlipConfig::default(),
        }
    }

    /// Set the summary format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Write the resulting tree to `path`.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Set the engine configuration.
    pub fn with_flip_config(mut self, flip: FlipConfig) -> Self {
        self.flip = flip;
        self
    }
}

/// Command-line arguments for `flip`.
#[derive(Parser, Debug)]
#[command(name = "flip")]
#[command(version, about = "Flip document types across a content tree snapshot", long_about = None)]
pub struct Args {
    /// Content tree snapshot (JSON).
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// Id of the node to publish. Publishing the settings node starts a run.
    #[arg(short, long)]
    pub publish: NodeId,

    /// Log what would change without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Summary output format.
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Write the resulting tree to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suffix marking the new variant of a document type.
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,

    /// Alias of the migration settings document type.
    #[arg(long, default_value = DEFAULT_SETTINGS_ALIAS)]
    pub settings_alias: String,

    /// Alias of the site root document type.
    #[arg(long, default_value = DEFAULT_ROOT_ALIAS)]
    pub root_alias: String,
}

impl Args {
    /// Convert command-line arguments to a configuration.
    pub fn into_config(self) -> CliConfig {
        let flip = FlipConfig::new()
            .with_suffix(self.suffix)
            .with_settings_alias(self.settings_alias)
            .with_root_alias(self.root_alias)
            .with_dry_run(self.dry_run);

        let config = CliConfig::new(self.snapshot, self.publish)
            .with_format(self.format)
            .with_flip_config(flip);

        match self.output {
            Some(path) => config.with_output(path),
            None => config,
        }
    }
}
