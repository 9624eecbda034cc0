//! Flip - document type flipping from the command line.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flip_cli::{format_summaries, run, Args};

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flip=info,flip_cli=info,flip_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.into_config();

    tracing::info!(
        snapshot = %config.snapshot.display(),
        publish = config.publish,
        dry_run = config.flip.dry_run,
        "configuration loaded"
    );

    let output = run(&config).and_then(|summaries| {
        let failed = summaries.iter().any(|s| s.has_failures());
        format_summaries(&summaries, config.format).map(|text| (text, failed))
    });

    match output {
        Ok((text, failed)) => {
            println!("{}", text);
            if failed {
                std::process::exit(2);
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "flip failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
