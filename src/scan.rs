//! Source directory scanning.
//!
//! Stage 1 of the pipeline: list the photos eligible for processing.
//!
//! The source directory is flat by contract — filenames are the manifest
//! key space and the derivative stems, so only the top level is scanned.
//! Subdirectories, dotfiles, and files whose extension is not on the
//! configured allow-list are skipped. The listing comes back sorted by
//! filename so hashing and reporting order is stable across runs.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read source directory {0}: {1}")]
    Unreadable(PathBuf, std::io::Error),
}

/// One eligible photo found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Filename, the key used by the manifest and override documents.
    pub filename: String,
    /// Full path for reading.
    pub path: PathBuf,
}

/// List eligible photos in `dir`, sorted by filename.
///
/// Fails only when the directory itself cannot be read; an unreadable
/// individual file surfaces later, at hash time. Filenames that are not
/// valid UTF-8 are skipped — they could not serve as manifest keys.
pub fn scan_source(dir: &Path, extensions: &[String]) -> Result<Vec<SourceFile>, ScanError> {
    let entries = fs::read_dir(dir).map_err(|e| ScanError::Unreadable(dir.to_path_buf(), e))?;

    let mut files = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if filename.starts_with('.') {
            continue;
        }
        if !is_eligible(&path, extensions) {
            continue;
        }
        files.push(SourceFile {
            filename: filename.to_string(),
            path,
        });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(files)
}

/// Case-insensitive extension check against the configured allow-list.
fn is_eligible(path: &Path, extensions: &[String]) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if ext.is_empty() {
        return false;
    }
    extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
}
