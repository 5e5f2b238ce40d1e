//! Per-photo transcode worker.
//!
//! One call, one photo: read capture metadata, decode, orient, downscale,
//! encode, write the derivative atomically. The worker is self-contained
//! with no shared mutable state, so the pool can run many in parallel; its
//! only output is a success or failure value for the merge step.

use std::path::Path;

use crate::config::PipelineConfig;
use crate::imaging::{self, ImagingError};
use crate::metadata;

/// One photo the pool should transcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeTask {
    /// Source filename, the manifest key.
    pub filename: String,
    /// Content hash of the source, computed during classification.
    pub hash: String,
}

/// Outcome of a successful transcode, ready for the manifest merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeSuccess {
    pub filename: String,
    pub hash: String,
    /// Where the derivative landed.
    pub optimized_path: String,
    /// Capture timestamp, extracted before the encode stripped it.
    pub date_taken: Option<String>,
}

/// A photo that could not be transcoded this run.
///
/// Failures never enter the manifest; they are reported and the photo is
/// retried naturally on the next run (no entry → reprocess).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeFailure {
    pub filename: String,
    pub error: String,
}

/// Transcode one photo into its WebP derivative.
pub fn process_photo(
    task: &TranscodeTask,
    config: &PipelineConfig,
) -> Result<TranscodeSuccess, ImagingError> {
    let source = Path::new(&config.source_dir).join(&task.filename);
    let output = config.derivative_path(&task.filename);

    // The derivative carries no EXIF, so capture metadata has to come from
    // the source. Best-effort; an unreadable block never fails the photo.
    let capture = metadata::read_capture_metadata(&source);

    let mut img = imaging::load_image(&source)?;
    if let Some(orientation) = capture.orientation {
        img = imaging::apply_orientation(img, orientation);
    }
    let img = imaging::downscale_to_fit(img, config.images.max_dimension);
    let bytes = imaging::encode_webp(&img, config.images.quality)?;
    imaging::write_atomic(&output, &bytes)?;

    Ok(TranscodeSuccess {
        filename: task.filename.clone(),
        hash: task.hash.clone(),
        optimized_path: output.to_string_lossy().into_owned(),
        date_taken: capture.date_taken,
    })
}
