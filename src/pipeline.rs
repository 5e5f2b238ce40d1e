//! Run orchestration.
//!
//! # Design
//!
//! One run is a strict sequence: scan → hash → classify → transcode →
//! merge → save. Transcoding is the only parallel stage; the bookkeeping
//! around it stays single-threaded, so the manifest has exactly one reader
//! and one writer per run and workers never touch shared files.
//!
//! Per-file problems (unreadable source, corrupt image, encoder rejection)
//! are collected, not raised: a run with K failures still produces a
//! consistent manifest for everything else. Only two things are fatal —
//! the source directory being unreadable and the final manifest write.
//!
//! [`plan`] is the read-only prefix of the same sequence, used by `status`
//! to preview the work without touching the output directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::mpsc::Sender;

use thiserror::Error;

use crate::classify::{Decision, classify};
use crate::config::PipelineConfig;
use crate::hashing;
use crate::manifest::{Manifest, PhotoRecord};
use crate::merge;
use crate::overrides::OverrideStore;
use crate::pool::{self, RunEvent};
use crate::scan::{self, ScanError, SourceFile};
use crate::transcode::{self, TranscodeFailure, TranscodeTask};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What one run did, for reporting.
#[derive(Debug)]
pub struct RunSummary {
    /// Eligible files found in the source directory.
    pub scanned: usize,
    /// Files skipped as already up to date.
    pub fresh: usize,
    /// Derivatives written this run.
    pub transcoded: usize,
    /// Per-file failures (hashing and transcoding), sorted by filename.
    pub failures: Vec<TranscodeFailure>,
    /// Tracked entries dropped because their source file disappeared.
    pub pruned: usize,
}

/// The work a run would do, as computed by `status`.
#[derive(Debug)]
pub struct RunPlan {
    /// Per-file decision, in filename order.
    pub decisions: Vec<(String, Decision)>,
    /// Files whose hash could not be computed.
    pub failures: Vec<TranscodeFailure>,
    /// Tracked filenames whose source file is gone.
    pub pruned: Vec<String>,
}

/// Execute one full pipeline run.
///
/// With `force`, classification runs against an empty manifest so every
/// scanned file reprocesses; pruning is still measured against the manifest
/// actually on disk.
pub fn run(
    config: &PipelineConfig,
    force: bool,
    events: Option<Sender<RunEvent>>,
) -> Result<RunSummary, PipelineError> {
    let files = scan::scan_source(Path::new(&config.source_dir), &config.images.extensions)?;
    fs::create_dir_all(&config.output_dir)?;

    let disk_manifest = Manifest::load(&config.manifest_path());
    let overrides = OverrideStore::load(Path::new(&config.overrides_file));

    let baseline = if force {
        Manifest::empty()
    } else {
        disk_manifest.clone()
    };

    let classified = classify_sources(&files, &baseline, config);
    let fresh = classified.keep.len();
    let pruned = pruned_entries(&disk_manifest, &files).len();

    let outcome = pool::run_batch(
        &classified.tasks,
        |task| transcode::process_photo(task, config),
        events,
    );

    let manifest = merge::merge(classified.keep, &outcome.successes, &overrides);
    manifest.save(&config.manifest_path())?;

    let mut failures = classified.hash_failures;
    failures.extend(outcome.failures);
    failures.sort_by(|a, b| a.filename.cmp(&b.filename));

    Ok(RunSummary {
        scanned: files.len(),
        fresh,
        transcoded: outcome.successes.len(),
        failures,
        pruned,
    })
}

/// Compute the work a run would do, without writing anything.
pub fn plan(config: &PipelineConfig) -> Result<RunPlan, PipelineError> {
    let files = scan::scan_source(Path::new(&config.source_dir), &config.images.extensions)?;
    let manifest = Manifest::load(&config.manifest_path());

    let classified = classify_sources(&files, &manifest, config);

    Ok(RunPlan {
        decisions: classified.decisions,
        failures: classified.hash_failures,
        pruned: pruned_entries(&manifest, &files),
    })
}

/// Classification pass shared by [`run`] and [`plan`].
struct Classified {
    decisions: Vec<(String, Decision)>,
    keep: Vec<(String, PhotoRecord)>,
    tasks: Vec<TranscodeTask>,
    hash_failures: Vec<TranscodeFailure>,
}

fn classify_sources(
    files: &[SourceFile],
    manifest: &Manifest,
    config: &PipelineConfig,
) -> Classified {
    let mut out = Classified {
        decisions: Vec::new(),
        keep: Vec::new(),
        tasks: Vec::new(),
        hash_failures: Vec::new(),
    };

    for file in files {
        let hash = match hashing::hash_file(&file.path) {
            Ok(h) => h,
            Err(e) => {
                out.hash_failures.push(TranscodeFailure {
                    filename: file.filename.clone(),
                    error: format!("hashing failed: {e}"),
                });
                continue;
            }
        };

        let entry = manifest.get(&file.filename);
        let output_exists = config.derivative_path(&file.filename).exists();
        let decision = classify(&hash, entry, output_exists);

        match &decision {
            Decision::Fresh => {
                // Fresh implies a structured entry with a matching hash.
                if let Some(record) = entry.and_then(|e| e.as_record()) {
                    out.keep.push((file.filename.clone(), record.clone()));
                }
            }
            Decision::Reprocess(_) => {
                out.tasks.push(TranscodeTask {
                    filename: file.filename.clone(),
                    hash,
                });
            }
        }
        out.decisions.push((file.filename.clone(), decision));
    }

    out
}

/// Tracked filenames that were not scanned this run (deleted sources).
fn pruned_entries(manifest: &Manifest, files: &[SourceFile]) -> Vec<String> {
    let scanned: BTreeSet<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    manifest
        .entries
        .keys()
        .filter(|name| !scanned.contains(name.as_str()))
        .cloned()
        .collect()
}
