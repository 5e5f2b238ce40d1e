//! Decode, transform, and encode pixels.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Orientation correction | `image` flip/rotate ops |
//! | Downscale | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → WebP (lossy) | `webp` crate (libwebp) |
//!
//! The `image` crate's own WebP encoder is lossless-only, which is why the
//! lossy quality-factor encode goes through libwebp instead.
//!
//! Derivatives are written atomically: encode to memory, write to a temp file
//! in the output directory, rename into place. A crash mid-write leaves no
//! half-encoded file at the final path for the change detector to mistake
//! for a finished derivative.

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

use super::calculations::fit_within;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("WebP encode failed: {0}")]
    Encode(String),
}

/// Load and decode a photo from disk, inferring the format from content.
pub fn load_image(path: &Path) -> Result<DynamicImage, ImagingError> {
    Ok(ImageReader::open(path)?.decode()?)
}

/// Rotate/flip pixels upright for an EXIF orientation value.
///
/// Value 1 is already upright; values outside 1–8 are not valid EXIF and
/// pass through unchanged.
pub fn apply_orientation(img: DynamicImage, orientation: u8) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Downscale so the longer edge is at most `max_dimension`, preserving
/// aspect ratio. Images already within the bound pass through untouched,
/// and nothing is ever upscaled.
pub fn downscale_to_fit(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    match fit_within((img.width(), img.height()), max_dimension) {
        Some((w, h)) => img.resize_exact(w, h, FilterType::Lanczos3),
        None => img,
    }
}

/// Encode as lossy WebP at the given quality factor.
///
/// libwebp only accepts packed RGB8/RGBA8 buffers, so other sample layouts
/// (16-bit PNG, grayscale TIFF) are converted first. Alpha is kept when the
/// source has it.
pub fn encode_webp(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, ImagingError> {
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
            .encode_simple(false, quality as f32)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
            .encode_simple(false, quality as f32)
    };
    let memory = encoded.map_err(|e| ImagingError::Encode(format!("{e:?}")))?;
    Ok(memory.to_vec())
}

/// Write bytes to `path` via a temp file in the same directory plus rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ImagingError> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
