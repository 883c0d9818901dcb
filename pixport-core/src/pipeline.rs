//! Batch conversion: discover export files, fan out per-article
//! normalization, write one Markdown document per published article.
//!
//! Fault isolation is per article and per file: a bad chunk is logged and
//! skipped, an unreadable file is logged and skipped, and the run always
//! attempts everything it discovered.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::article::{normalize_chunk, ChunkOutcome};
use crate::diag;
use crate::render::to_markdown_document;
use crate::slug::FilenameAllocator;
use crate::splitter::{normalize_line_endings, split_articles};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub output_root: PathBuf,
    pub dry_run: bool,
    pub show_progress: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("out"),
            dry_run: false,
            show_progress: true,
        }
    }
}

/// Per-file conversion tally.
#[derive(Debug, Default, Clone)]
pub struct FileSummary {
    pub blog: String,
    pub written: usize,
    pub drafts: usize,
    pub discarded: usize,
    pub failed: usize,
}

/// Whole-run tally across all export files.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub files: usize,
    pub failed_files: usize,
    pub written: usize,
    pub drafts: usize,
    pub discarded: usize,
    pub failed_articles: usize,
}

/// Export files directly under the input root, sorted for a stable run order.
pub fn discover_exports(input_root: &Path) -> Result<Vec<PathBuf>> {
    if !input_root.is_dir() {
        anyhow::bail!("input root {:?} is not a directory", input_root);
    }
    let mut files: Vec<PathBuf> = WalkDir::new(input_root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("txt"))
        .collect();
    files.sort();
    Ok(files)
}

/// Convert one export file into `{output_root}/{blog}/`.
#[instrument(skip_all, fields(file = %path.display()))]
pub fn convert_export_file(path: &Path, opts: &ConvertOptions) -> Result<FileSummary> {
    let blog = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("export file {:?} has no usable name", path))?
        .to_string();

    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    let text = normalize_line_endings(&raw);
    let chunks = split_articles(&text);

    let out_dir = opts.output_root.join(&blog);
    if !opts.dry_run {
        // Must exist before any article write below.
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create directory {:?}", out_dir))?;
    }

    let pb = maybe_spinner(opts.show_progress, &blog);

    // Normalization is pure per chunk; collect restores source order.
    let outcomes: Vec<_> = chunks.par_iter().map(|chunk| normalize_chunk(chunk)).collect();

    let mut summary = FileSummary {
        blog: blog.clone(),
        ..FileSummary::default()
    };
    let mut names = FilenameAllocator::new();

    for (chunk, outcome) in chunks.iter().zip(outcomes) {
        match outcome {
            Ok(ChunkOutcome::Article(article)) => {
                let stem = names.next(&article.file_stem);
                if stem != article.file_stem {
                    warn!(blog = %blog, stem = %stem, "file stem collision, suffixed");
                }
                if opts.dry_run {
                    debug!(stem = %stem, "dry-run: skipping write");
                } else {
                    let out_path = out_dir.join(format!("{stem}.md"));
                    if let Err(err) = fs::write(&out_path, to_markdown_document(&article)) {
                        warn!(path = %out_path.display(), error = %err, "failed to write article");
                        summary.failed += 1;
                        continue;
                    }
                }
                summary.written += 1;
                if let Some(pb) = pb.as_ref() {
                    pb.inc(1);
                    pb.set_message(stem);
                }
            }
            Ok(ChunkOutcome::Draft { title }) => {
                debug!(title = %title, "draft suppressed");
                summary.drafts += 1;
            }
            Ok(ChunkOutcome::NotArticle) => summary.discarded += 1,
            Err(err) => {
                warn!(report = %diag::failure_report(&err, chunk), "skipping unparseable article");
                summary.failed += 1;
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message(format!("{blog}: {} article(s) written", summary.written));
    }
    info!(
        blog = %blog,
        written = summary.written,
        drafts = summary.drafts,
        discarded = summary.discarded,
        failed = summary.failed,
        "export file converted"
    );
    Ok(summary)
}

/// Convert every export file under the input root.
pub fn run(input_root: &Path, opts: &ConvertOptions) -> Result<RunSummary> {
    let files = discover_exports(input_root)?;

    // Cap parallelism to avoid overwhelming the filesystem
    let threads = num_cpus::get().min(8);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("failed to build thread pool")?;

    let mut summary = RunSummary::default();
    for path in &files {
        summary.files += 1;
        match pool.install(|| convert_export_file(path, opts)) {
            Ok(file_summary) => {
                summary.written += file_summary.written;
                summary.drafts += file_summary.drafts;
                summary.discarded += file_summary.discarded;
                summary.failed_articles += file_summary.failed;
            }
            Err(err) => {
                warn!(file = %path.display(), error = %format!("{err:#}"), "skipping export file");
                summary.failed_files += 1;
            }
        }
    }

    info!(
        files = summary.files,
        written = summary.written,
        failed_files = summary.failed_files,
        "conversion run complete"
    );
    Ok(summary)
}

fn maybe_spinner(show_progress: bool, blog: &str) -> Option<ProgressBar> {
    if !show_progress {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {pos} written: {msg}")
            .expect("progress template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(blog.to_string());
    if pb.is_hidden() {
        None
    } else {
        Some(pb)
    }
}
