//! Shared test utilities for the picpress test suite.
//!
//! Builders for synthetic photos — real encoded JPEG/PNG bytes, optionally
//! with a hand-assembled EXIF APP1 segment spliced in — plus a scratch
//! project layout with source and output directories wired into a config.

use crate::config::PipelineConfig;
use image::{DynamicImage, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =========================================================================
// Project fixture
// =========================================================================

/// A scratch pipeline layout: temp root holding `originals/`, `optimized/`,
/// and `user_metadata.json`, with a config pointing at all three.
pub struct TestProject {
    _root: TempDir,
    pub config: PipelineConfig,
}

impl TestProject {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("originals")).unwrap();

        let config = PipelineConfig {
            source_dir: root.path().join("originals").to_string_lossy().into_owned(),
            output_dir: root.path().join("optimized").to_string_lossy().into_owned(),
            overrides_file: root
                .path()
                .join("user_metadata.json")
                .to_string_lossy()
                .into_owned(),
            ..PipelineConfig::default()
        };
        Self { _root: root, config }
    }

    pub fn source_path(&self, name: &str) -> PathBuf {
        Path::new(&self.config.source_dir).join(name)
    }

    /// Write a small decodable JPEG photo into the source directory.
    pub fn add_photo(&self, name: &str, width: u32, height: u32) {
        write_test_jpeg(&self.source_path(name), width, height);
    }

    /// Write bytes that carry a photo extension but don't decode.
    pub fn add_corrupt_photo(&self, name: &str) {
        fs::write(self.source_path(name), b"definitely not an image").unwrap();
    }

    pub fn write_overrides(&self, json: &str) {
        fs::write(&self.config.overrides_file, json).unwrap();
    }

    pub fn write_manifest(&self, json: &str) {
        fs::create_dir_all(&self.config.output_dir).unwrap();
        fs::write(self.config.manifest_path(), json).unwrap();
    }

    pub fn read_manifest_text(&self) -> String {
        fs::read_to_string(self.config.manifest_path()).unwrap()
    }
}

// =========================================================================
// Synthetic images
// =========================================================================

/// Deterministic gradient image; distinguishable pixels survive a resize.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

/// Encode a gradient as JPEG at `path`.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

/// Encode a gradient as PNG at `path`.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Encode a gradient as JPEG with an EXIF APP1 segment spliced in after SOI.
///
/// Decodable by the imaging stage *and* carrying capture metadata, like a
/// camera original.
pub fn write_jpeg_with_exif(
    path: &Path,
    width: u32,
    height: u32,
    orientation: Option<u16>,
    date_time: Option<&str>,
    date_time_original: Option<&str>,
) {
    let mut encoded = Vec::new();
    gradient(width, height)
        .write_to(
            &mut std::io::Cursor::new(&mut encoded),
            image::ImageFormat::Jpeg,
        )
        .unwrap();

    let app1 = app1_segment(orientation, date_time, date_time_original);
    let mut out = Vec::with_capacity(encoded.len() + app1.len());
    out.extend_from_slice(&encoded[..2]); // SOI
    out.extend_from_slice(&app1);
    out.extend_from_slice(&encoded[2..]);
    fs::write(path, out).unwrap();
}

/// A minimal JPEG whose only payload is an EXIF APP1 segment. Enough for
/// metadata extraction; not decodable as pixels.
pub fn exif_only_jpeg(
    orientation: Option<u16>,
    date_time: Option<&str>,
    date_time_original: Option<&str>,
) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8]; // SOI
    jpeg.extend_from_slice(&app1_segment(orientation, date_time, date_time_original));
    jpeg.extend_from_slice(&[0xFF, 0xD9]); // EOI
    jpeg
}

// =========================================================================
// EXIF byte assembly
// =========================================================================
//
// Little-endian TIFF with IFD0 holding Orientation (0x0112), DateTime
// (0x0132), and — when DateTimeOriginal is requested — a pointer (0x8769)
// to an Exif sub-IFD holding DateTimeOriginal (0x9003). Entries appear in
// ascending tag order; ASCII values land in a data area after the IFDs.

fn app1_segment(
    orientation: Option<u16>,
    date_time: Option<&str>,
    date_time_original: Option<&str>,
) -> Vec<u8> {
    let tiff = build_tiff(orientation, date_time, date_time_original);
    let mut payload = Vec::with_capacity(6 + tiff.len());
    payload.extend_from_slice(b"Exif\0\0");
    payload.extend_from_slice(&tiff);

    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&payload);
    segment
}

fn build_tiff(
    orientation: Option<u16>,
    date_time: Option<&str>,
    date_time_original: Option<&str>,
) -> Vec<u8> {
    let ifd0_entries = orientation.is_some() as usize
        + date_time.is_some() as usize
        + date_time_original.is_some() as usize; // the sub-IFD pointer
    let ifd0_offset = 8usize;
    let ifd0_len = 2 + ifd0_entries * 12 + 4;
    let exif_ifd_offset = ifd0_offset + ifd0_len;
    let exif_ifd_len = if date_time_original.is_some() { 18 } else { 0 };
    let mut data_offset = exif_ifd_offset + exif_ifd_len;

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&(ifd0_offset as u32).to_le_bytes());

    let mut data = Vec::new();

    // IFD0
    tiff.extend_from_slice(&(ifd0_entries as u16).to_le_bytes());
    if let Some(value) = orientation {
        tiff.extend_from_slice(&0x0112u16.to_le_bytes());
        tiff.extend_from_slice(&3u16.to_le_bytes()); // SHORT
        tiff.extend_from_slice(&1u32.to_le_bytes());
        tiff.extend_from_slice(&value.to_le_bytes());
        tiff.extend_from_slice(&[0, 0]);
    }
    if let Some(value) = date_time {
        push_ascii_entry(&mut tiff, &mut data, &mut data_offset, 0x0132, value);
    }
    if date_time_original.is_some() {
        tiff.extend_from_slice(&0x8769u16.to_le_bytes());
        tiff.extend_from_slice(&4u16.to_le_bytes()); // LONG
        tiff.extend_from_slice(&1u32.to_le_bytes());
        tiff.extend_from_slice(&(exif_ifd_offset as u32).to_le_bytes());
    }
    tiff.extend_from_slice(&0u32.to_le_bytes()); // no next IFD

    // Exif sub-IFD
    if let Some(value) = date_time_original {
        tiff.extend_from_slice(&1u16.to_le_bytes());
        push_ascii_entry(&mut tiff, &mut data, &mut data_offset, 0x9003, value);
        tiff.extend_from_slice(&0u32.to_le_bytes());
    }

    tiff.extend_from_slice(&data);
    tiff
}

fn push_ascii_entry(
    tiff: &mut Vec<u8>,
    data: &mut Vec<u8>,
    data_offset: &mut usize,
    tag: u16,
    value: &str,
) {
    let mut bytes = value.as_bytes().to_vec();
    bytes.push(0);

    tiff.extend_from_slice(&tag.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes()); // ASCII
    tiff.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    if bytes.len() <= 4 {
        let mut slot = [0u8; 4];
        slot[..bytes.len()].copy_from_slice(&bytes);
        tiff.extend_from_slice(&slot);
    } else {
        tiff.extend_from_slice(&(*data_offset as u32).to_le_bytes());
        *data_offset += bytes.len();
        data.extend_from_slice(&bytes);
    }
}
