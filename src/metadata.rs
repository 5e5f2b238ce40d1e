//! Capture metadata extraction.
//!
//! Pulls two things out of a photo's EXIF block before transcoding (the
//! derivative encode strips metadata, so this is the only chance):
//!
//! - **Capture time.** `DateTimeOriginal` (when the shutter fired) wins;
//!   `DateTime` (the in-camera/editor modification stamp) is the fallback
//!   for scans and exports that never had the former. EXIF timestamps use
//!   `YYYY:MM:DD HH:MM:SS`; values that parse are normalized to ISO-8601
//!   (`YYYY-MM-DDTHH:MM:SS`), values that don't are kept raw — an oddball
//!   timestamp in the manifest beats no timestamp.
//!
//! - **Orientation.** Tag values 1–8, consumed by the imaging stage to
//!   rotate pixels upright before encoding.
//!
//! Extraction is best-effort throughout: no EXIF block, an unreadable file,
//! or a mangled field yields [`CaptureMetadata::default`]. Metadata never
//! fails a photo.

use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF timestamp layout, e.g. `2024:06:01 12:34:56`.
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Normalized layout written to the manifest.
const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Best-effort capture metadata for one photo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureMetadata {
    /// Capture timestamp, ISO-8601 when the EXIF value parsed cleanly.
    pub date_taken: Option<String>,
    /// EXIF orientation value (1–8), when present and in range.
    pub orientation: Option<u8>,
}

/// Read capture metadata from a photo. Never fails.
pub fn read_capture_metadata(path: &Path) -> CaptureMetadata {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return CaptureMetadata::default(),
    };
    let mut reader = BufReader::new(file);
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(e) => e,
        Err(_) => return CaptureMetadata::default(),
    };

    let date_taken = ascii_field(&exif, exif::Tag::DateTimeOriginal)
        .or_else(|| ascii_field(&exif, exif::Tag::DateTime))
        .map(|raw| normalize_exif_datetime(&raw));

    CaptureMetadata {
        date_taken,
        orientation: orientation_field(&exif),
    }
}

/// Normalize an EXIF timestamp to ISO-8601, passing unparseable values
/// through unchanged.
pub fn normalize_exif_datetime(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, EXIF_DATETIME_FORMAT) {
        Ok(dt) => dt.format(ISO_DATETIME_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Raw string content of an ASCII field, trimmed of NULs and whitespace.
fn ascii_field(exif: &exif::Exif, tag: exif::Tag) -> Option<String> {
    let field = exif.get_field(tag, exif::In::PRIMARY)?;
    match &field.value {
        exif::Value::Ascii(chunks) => chunks
            .first()
            .map(|bytes| {
                String::from_utf8_lossy(bytes)
                    .trim_end_matches('\0')
                    .trim()
                    .to_string()
            })
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// EXIF orientation (1–8). Out-of-range values are treated as absent.
fn orientation_field(exif: &exif::Exif) -> Option<u8> {
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    match field.value.get_uint(0) {
        Some(v @ 1..=8) => Some(v as u8),
        _ => None,
    }
}
