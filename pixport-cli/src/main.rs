//! pixport - blog export archive to Markdown converter.
//!
//! Reads `.txt` export archives (one per blog) from the input root, splits
//! each into articles, and writes one Markdown file with YAML front matter
//! per published article under the output root.

use anyhow::{Context, Result};
use clap::Parser;
use pixport_core::pipeline::{run, ConvertOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let mut config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.apply_cli(&cli);
    debug!(
        input = %config.input_root.display(),
        output = %config.output_root.display(),
        "resolved configuration"
    );

    let opts = ConvertOptions {
        output_root: config.output_root.clone(),
        dry_run: cli.dry_run,
        show_progress: !cli.quiet,
    };

    let summary = run(&config.input_root, &opts)?;

    println!(
        "Converted {} file(s): {} article(s) written, {} draft(s) suppressed, {} failed",
        summary.files, summary.written, summary.drafts, summary.failed_articles
    );
    if summary.failed_files > 0 {
        println!(
            "{} export file(s) skipped entirely; see log for details",
            summary.failed_files
        );
    }
    Ok(())
}

fn init_tracing(debug: bool) -> Result<()> {
    let filter = if debug {
        // Debug mode: set debug level unless RUST_LOG is explicitly set
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}
