//! Flip CLI - runs document type flips over content tree snapshots.

pub mod config;
pub mod error;
pub mod formatter;
pub mod runner;

pub use config::{Args, CliConfig};
pub use error::Error;
pub use formatter::{format_summaries, OutputFormat};
pub use runner::run;
