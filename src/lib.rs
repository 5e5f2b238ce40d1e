//! # Picpress
//!
//! An incremental photo optimizer. Point it at a directory of original
//! photos and it maintains a parallel directory of web-ready WebP
//! derivatives plus a JSON manifest recording what was done. Only photos
//! whose content actually changed are reprocessed.
//!
//! # Architecture: One Pass, Four Stages
//!
//! Every run executes the same sequence over the source directory:
//!
//! ```text
//! 1. Scan       originals/      →  eligible files       (flat, sorted, by extension)
//! 2. Classify   files + hashes  →  fresh | reprocess    (five ordered rules)
//! 3. Transcode  reprocess set   →  optimized/*.webp     (parallel, per-photo isolation)
//! 4. Merge      kept + results  →  manifest.json        (overrides overlaid, rest pruned)
//! ```
//!
//! The manifest is rebuilt from scratch each run rather than mutated in
//! place. That one choice buys most of the system's guarantees:
//!
//! - **Deletions prune themselves**: an entry survives only if its source
//!   file was scanned this run.
//! - **Failures can't corrupt state**: a photo that fails to transcode
//!   simply contributes no entry, so the next run retries it as new.
//! - **Idempotence is observable**: two runs over unchanged sources write
//!   byte-identical manifests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Source discovery — eligible files in the source directory, sorted |
//! | [`hashing`] | SHA-256 content identity for change detection |
//! | [`classify`] | Per-file decision rules: new, legacy entry, content changed, derivative missing |
//! | [`manifest`] | `manifest.json` schema — structured records plus legacy bare-hash entries |
//! | [`overrides`] | `user_metadata.json` loading — per-photo metadata corrections |
//! | [`metadata`] | EXIF capture time and orientation extraction |
//! | [`imaging`] | Decode, orientation fix, Lanczos3 downscale, lossy WebP encode, atomic write |
//! | [`transcode`] | Per-photo worker: source file → derivative + extracted metadata |
//! | [`pool`] | Parallel batch execution with panic isolation and progress events |
//! | [`merge`] | Next manifest from kept records, transcode results, and overrides |
//! | [`pipeline`] | Run orchestration: scan → classify → transcode → merge → save |
//! | [`config`] | `picpress.toml` loading and validation |
//! | [`output`] | CLI output formatting for runs and status previews |
//!
//! # Design Decisions
//!
//! ## Content Hash Over Mtime
//!
//! Change detection compares SHA-256 digests of file bytes, never
//! timestamps. Mtimes churn under file syncing, backup restores, and
//! plain copies, which would force spurious re-encodes of an unchanged
//! library; a content hash re-derives the same identity no matter how the
//! bytes arrived. The digest is also what the manifest stores, so the
//! manifest doubles as a record of exactly which version of each photo
//! the derivative was built from.
//!
//! ## WebP-Only Output
//!
//! All derivatives are lossy WebP at a configurable quality factor.
//! A single modern format keeps the output directory uniform and the
//! manifest schema trivial (`<stem>.webp` per source photo). The `image`
//! crate only writes lossless WebP, so encoding goes through `libwebp`
//! (the `webp` crate), which exposes the quality knob; decoding and pixel
//! operations stay in pure-Rust `image`.
//!
//! ## Rebuild, Don't Mutate
//!
//! [`merge`] assembles each run's manifest from two inputs only: records
//! carried over for fresh files and results from this run's transcodes.
//! Nothing else survives. There is no delete path, no repair path, and no
//! partial-update path to get wrong — pruning and failure recovery fall
//! out of what merge simply doesn't copy forward.
//!
//! ## Overrides as an Overlay
//!
//! `user_metadata.json` corrections are reapplied to matching manifest
//! entries on every run. They never trigger a reprocess (pixels didn't
//! change) and never create entries (an override for an unscanned file is
//! inert). Editing a caption therefore costs a manifest rewrite, not a
//! re-encode of the photo.
//!
//! ## Per-Photo Crash Isolation
//!
//! Workers run under a panic boundary. One poisoned image — a trick
//! header that panics a decoder, say — fails that photo alone; the batch
//! completes and the failure is reported with its cause. Failed photos
//! are absent from the manifest, so the next run picks them up again
//! automatically.

pub mod classify;
pub mod config;
pub mod hashing;
pub mod imaging;
pub mod manifest;
pub mod merge;
pub mod metadata;
pub mod output;
pub mod overrides;
pub mod pipeline;
pub mod pool;
pub mod scan;
pub mod transcode;

#[cfg(test)]
pub(crate) mod test_helpers;
