//! Manifest assembly at the end of a run.
//!
//! # Design
//!
//! The new manifest is rebuilt from scratch every run as the union of two
//! sets keyed by filename:
//!
//! - **fresh** files: the prior record copied forward, overrides re-applied
//!   (an override added while a file was already fresh still surfaces
//!   without forcing a reprocess);
//! - **successful transcodes**: a baseline record from the transcode result,
//!   extracted metadata layered on, overrides layered last.
//!
//! Failed transcodes and deleted files contribute nothing, so pruning is
//! implicit: what the merge never sees never reaches the manifest.
//!
//! Overrides are a shallow field-level overlay, and the overlay always wins.
//! The fixed record fields keep their schema: `hash`, `filename` and
//! `optimized_path` accept only string overrides (anything else would
//! corrupt the record for every downstream consumer of the manifest);
//! `date_taken` accepts a string or an explicit null to clear it; all other
//! keys land verbatim in the record's open field map, any JSON type allowed.

use serde_json::Value;

use crate::manifest::{Manifest, ManifestEntry, PhotoRecord};
use crate::overrides::{OverrideFields, OverrideStore};
use crate::transcode::TranscodeSuccess;

/// Build the new manifest from this run's outcomes.
pub fn merge(
    keep: Vec<(String, PhotoRecord)>,
    results: &[TranscodeSuccess],
    overrides: &OverrideStore,
) -> Manifest {
    let mut manifest = Manifest::empty();

    for (filename, mut record) in keep {
        if let Some(fields) = overrides.fields_for(&filename) {
            apply_overrides(&mut record, fields);
        }
        manifest.insert(filename, ManifestEntry::Record(record));
    }

    for success in results {
        let mut record = PhotoRecord::baseline(
            success.hash.clone(),
            success.filename.clone(),
            success.optimized_path.clone(),
        );
        record.date_taken = success.date_taken.clone();
        if let Some(fields) = overrides.fields_for(&success.filename) {
            apply_overrides(&mut record, fields);
        }
        manifest.insert(success.filename.clone(), ManifestEntry::Record(record));
    }

    manifest
}

/// Overlay user override fields onto a record, field by field.
pub fn apply_overrides(record: &mut PhotoRecord, fields: &OverrideFields) {
    for (key, value) in fields {
        match key.as_str() {
            "hash" => {
                if let Value::String(s) = value {
                    record.hash = s.clone();
                }
            }
            "filename" => {
                if let Value::String(s) = value {
                    record.filename = s.clone();
                }
            }
            "optimized_path" => {
                if let Value::String(s) = value {
                    record.optimized_path = s.clone();
                }
            }
            "date_taken" => match value {
                Value::String(s) => record.date_taken = Some(s.clone()),
                Value::Null => record.date_taken = None,
                _ => {}
            },
            _ => {
                record.extra.insert(key.clone(), value.clone());
            }
        }
    }
}
