//! PDF folder loader.
//!
//! Reads every `*.pdf` file directly inside one folder (no recursion, no
//! filtering beyond the extension) and turns each page into a
//! [`Document`]. Files are visited in file-name order so runs are
//! reproducible.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::OnError;
use crate::extract::extract_pdf_pages;
use crate::models::Document;

/// A PDF that could not be read and was left out.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of loading a folder.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<Document>,
    pub files_loaded: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Load every PDF in `folder` as page-level documents.
///
/// # Errors
///
/// - `folder` does not exist or is not a directory.
/// - A PDF cannot be read or parsed and `on_error` is [`OnError::Abort`].
pub fn load_folder(folder: &Path, on_error: OnError) -> Result<LoadReport> {
    if !folder.is_dir() {
        bail!("PDF folder does not exist: {}", folder.display());
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_pdf = entry
            .file_name()
            .to_str()
            .map(|n| n.ends_with(".pdf"))
            .unwrap_or(false);
        if is_pdf {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut report = LoadReport::default();
    for path in paths {
        match load_pdf(&path) {
            Ok(docs) => {
                debug!(file = %path.display(), pages = docs.len(), "loaded pdf");
                report.files_loaded += 1;
                report.documents.extend(docs);
            }
            Err(e) => match on_error {
                OnError::Abort => {
                    return Err(e.context(format!("Failed to load {}", path.display())));
                }
                OnError::Skip => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable pdf");
                    report.skipped.push(SkippedFile {
                        path,
                        reason: format!("{:#}", e),
                    });
                }
            },
        }
    }

    info!(
        folder = %folder.display(),
        files = report.files_loaded,
        pages = report.documents.len(),
        skipped = report.skipped.len(),
        "documents loaded"
    );
    Ok(report)
}

/// Read one PDF and return one document per page.
pub fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let pages = extract_pdf_pages(&bytes)?;

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(i, text)| Document {
            source: source.clone(),
            path: path.to_path_buf(),
            page: i as u32 + 1,
            text,
        })
        .collect())
}
