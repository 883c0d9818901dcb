use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "pixport",
    author,
    version,
    about = "Convert Pixnet blog export archives into Markdown articles",
    long_about = "Split proprietary blog export files into individual articles, convert their \
                  HTML bodies to Markdown, and write one front-mattered document per published \
                  article under the output root."
)]
pub struct Cli {
    /// Directory containing the blog export .txt files
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Root directory for the generated Markdown tree
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Path to a TOML config file (default: ~/.pixport/config.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Parse and convert everything but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Verbose logging (RUST_LOG overrides)
    #[arg(long)]
    pub debug: bool,
}
