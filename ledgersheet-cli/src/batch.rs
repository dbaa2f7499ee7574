//! Folder-level orchestration shared by both pipelines.
//!
//! Files are processed one at a time. Any failure is contained to its file:
//! it is logged and counted, and the batch moves on.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Output written to this path.
    Written(PathBuf),
    /// Readable, but nothing to export. No file is produced.
    NoContent,
}

/// A per-file conversion strategy.
pub trait Pipeline {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// File name (not path) of the output for `pdf`.
    fn output_name(&self, pdf: &Path) -> String;

    fn process(&self, pdf: &Path, output_dir: &Path) -> Result<FileOutcome>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub discovered: usize,
    pub written: usize,
    pub empty: usize,
    pub failed: usize,
}

/// `<stem><suffix>.<ext>` for an input PDF.
pub fn output_file_name(pdf: &Path, suffix: &str, ext: &str) -> String {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    format!("{stem}{suffix}.{ext}")
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// A single `.pdf` file, or the `.pdf` files directly inside a folder
/// (sorted by name, no recursion).
pub fn discover_pdfs(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        bail!("input not found: {}", input.display());
    }

    if input.is_file() {
        if is_pdf(input) {
            return Ok(vec![input.to_path_buf()]);
        }
        warn!("not a PDF file: {}", input.display());
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("listing {}", input.display()))?;
        if entry.file_type().is_file() && is_pdf(entry.path()) {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}

fn process_isolated(pipeline: &dyn Pipeline, pdf: &Path, output_dir: &Path) -> Result<FileOutcome> {
    panic::catch_unwind(AssertUnwindSafe(|| pipeline.process(pdf, output_dir)))
        .unwrap_or_else(|_| Err(anyhow!("{} pipeline panicked", pipeline.name())))
}

/// Run `pipeline` over every PDF under `input`, writing into `output_dir`
/// (created if missing).
///
/// Only setup problems (output folder cannot be created, input cannot be
/// listed) are returned as errors.
pub fn run_batch(pipeline: &dyn Pipeline, input: &Path, output_dir: &Path) -> Result<BatchReport> {
    fs::create_dir_all(output_dir).with_context(|| format!("create {}", output_dir.display()))?;

    let pdfs = discover_pdfs(input)?;
    let mut report = BatchReport {
        discovered: pdfs.len(),
        ..BatchReport::default()
    };

    if pdfs.is_empty() {
        warn!("no PDF files found in {}", input.display());
        return Ok(report);
    }

    let total = pdfs.len();
    for (i, pdf) in pdfs.iter().enumerate() {
        info!("[{}/{}] {}: processing {}", i + 1, total, pipeline.name(), pdf.display());

        match process_isolated(pipeline, pdf, output_dir) {
            Ok(FileOutcome::Written(path)) => {
                info!("saved {}", path.display());
                report.written += 1;
            }
            Ok(FileOutcome::NoContent) => {
                warn!("nothing to export from {}", pdf.display());
                report.empty += 1;
            }
            Err(e) => {
                error!("failed {}: {e:#}", pdf.display());
                report.failed += 1;
            }
        }
    }

    info!(
        written = report.written,
        empty = report.empty,
        failed = report.failed,
        "{} batch finished",
        pipeline.name()
    );
    Ok(report)
}
