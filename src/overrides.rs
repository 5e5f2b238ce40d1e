//! User-authored metadata overrides.
//!
//! Alongside the pipeline lives a hand-maintained `user_metadata.json`:
//! a JSON object keyed by source filename whose values are partial record
//! objects (location, tags, caption corrections — any field at all). The
//! merge step overlays these fields onto pipeline-derived records, and an
//! override always wins over a derived value of the same name.
//!
//! The store is read-only to the pipeline; it is loaded once per run with
//! the same tolerance as the manifest (missing or malformed → empty), since
//! a broken overrides file should cost the user their corrections for one
//! run, not the whole batch.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Partial record fields authored for one filename.
pub type OverrideFields = BTreeMap<String, Value>;

/// The override document: source filename → partial record fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideStore {
    pub entries: BTreeMap<String, OverrideFields>,
}

impl OverrideStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from `path`. Returns an empty store if the file doesn't exist
    /// or doesn't parse as an object of objects.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str(&content) {
            Ok(entries) => Self { entries },
            Err(_) => Self::empty(),
        }
    }

    /// Override fields for a filename, if any were authored.
    pub fn fields_for(&self, filename: &str) -> Option<&OverrideFields> {
        self.entries.get(filename)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
