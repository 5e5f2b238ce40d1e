//! Change detection for incremental runs.
//!
//! Decides, per scanned file, whether the stored manifest entry is still
//! good (*fresh*) or the file needs a trip through the transcoder.
//!
//! The rules are ordered, and the order is load-bearing:
//!
//! 1. No entry for the filename → reprocess (new file).
//! 2. Legacy bare-hash entry → reprocess (schema upgrade; there are no
//!    structured fields worth keeping).
//! 3. Stored hash ≠ fresh hash → reprocess (content changed).
//! 4. Expected derivative missing on disk → reprocess (output deleted or
//!    lost externally).
//! 5. Otherwise → fresh.
//!
//! Legacy detection must run before the hash comparison: a legacy value *is*
//! a hash, and comparing against it would wrongly keep a schema-less entry
//! alive when the content happens to match. Hash and derivative existence
//! are both re-validated on every run; an existing derivative alone never
//! counts as "done".

use crate::manifest::ManifestEntry;
use std::fmt;

/// Why a file is being sent back through the transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReprocessReason {
    New,
    LegacyEntry,
    ContentChanged,
    DerivativeMissing,
}

impl fmt::Display for ReprocessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReprocessReason::New => "new",
            ReprocessReason::LegacyEntry => "legacy entry",
            ReprocessReason::ContentChanged => "content changed",
            ReprocessReason::DerivativeMissing => "derivative missing",
        };
        f.write_str(s)
    }
}

/// Classification outcome for one scanned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Entry is current; copy it forward (overrides get re-applied).
    Fresh,
    /// Enqueue for the transcode pool.
    Reprocess(ReprocessReason),
}

impl Decision {
    pub fn needs_processing(&self) -> bool {
        matches!(self, Decision::Reprocess(_))
    }
}

/// Classify one file against its manifest entry and derivative state.
pub fn classify(fresh_hash: &str, entry: Option<&ManifestEntry>, output_exists: bool) -> Decision {
    let record = match entry {
        None => return Decision::Reprocess(ReprocessReason::New),
        Some(ManifestEntry::Legacy(_)) => {
            return Decision::Reprocess(ReprocessReason::LegacyEntry);
        }
        Some(ManifestEntry::Record(record)) => record,
    };
    if record.hash != fresh_hash {
        return Decision::Reprocess(ReprocessReason::ContentChanged);
    }
    if !output_exists {
        return Decision::Reprocess(ReprocessReason::DerivativeMissing);
    }
    Decision::Fresh
}
