//! Persistent processing manifest.
//!
//! The manifest is the pipeline's sole durable state: a JSON object mapping
//! source filenames to their processing records, written to
//! `<output_dir>/manifest.json` at the end of every run.
//!
//! # Design
//!
//! **Loading never fails.** A missing or unparseable manifest degrades to an
//! empty one, which just means every photo is reprocessed on this run. A
//! corrupt manifest must never halt the pipeline — the data it holds can be
//! regenerated from the sources, so "start over" is always a safe recovery.
//!
//! **Legacy entries are recognized, not rejected.** Early manifests stored
//! only the content hash as a bare string per filename. Those values decode
//! into [`ManifestEntry::Legacy`] and force a reprocess (the structured
//! fields can't be recovered from a hash), instead of poisoning the parse.
//!
//! **Saves are atomic and sorted.** The document is written to a temp file
//! in the destination directory and renamed into place, so a concurrent
//! reader never observes a half-written manifest. Keys come out sorted
//! (`BTreeMap`), keeping diffs stable for the tools that post-process the
//! manifest.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

/// A structured record for one tracked source file.
///
/// The fixed fields are pipeline-derived; anything else (location, tags,
/// captions) rides along in `extra` and serializes at the same level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Content hash of the source at last successful processing.
    pub hash: String,
    /// Source filename, repeated inside the record for tools that consume
    /// records without their keys.
    pub filename: String,
    /// Derivative location, relative to the working root.
    pub optimized_path: String,
    /// Capture timestamp, ISO-8601 when the EXIF value parsed cleanly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_taken: Option<String>,
    /// Open-ended user fields layered onto the record by the merge step.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PhotoRecord {
    /// Baseline record with no metadata or user fields.
    pub fn baseline(hash: String, filename: String, optimized_path: String) -> Self {
        Self {
            hash,
            filename,
            optimized_path,
            date_taken: None,
            extra: BTreeMap::new(),
        }
    }
}

/// One manifest value: a structured record, or a legacy bare hash string.
///
/// Decoded with `#[serde(untagged)]` so both shapes parse from the same
/// document; a legacy value is always treated as stale by classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestEntry {
    Record(PhotoRecord),
    Legacy(String),
}

impl ManifestEntry {
    /// The structured record, if this entry has one.
    pub fn as_record(&self) -> Option<&PhotoRecord> {
        match self {
            ManifestEntry::Record(record) => Some(record),
            ManifestEntry::Legacy(_) => None,
        }
    }
}

/// The manifest: source filename → entry, sorted by filename.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Create an empty manifest (used for `--force` or a first run).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from `path`. Returns an empty manifest if the file doesn't
    /// exist or doesn't parse.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str(&content) {
            Ok(manifest) => manifest,
            Err(_) => Self::empty(),
        }
    }

    /// Save to `path` as pretty-printed JSON, atomically.
    ///
    /// Writes to a temp file in the destination directory and renames it
    /// into place; on failure the temp file is cleaned up on drop and the
    /// previous manifest stays untouched.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let dir = path.parent().unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn get(&self, filename: &str) -> Option<&ManifestEntry> {
        self.entries.get(filename)
    }

    pub fn insert(&mut self, filename: String, entry: ManifestEntry) {
        self.entries.insert(filename, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
