//! Pipeline configuration module.
//!
//! Handles loading and validating `picpress.toml`. Configuration is flat:
//! stock defaults are overridden by an optional config file, and directory
//! flags on the command line override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "originals"        # Where source photos live
//! output_dir = "optimized"        # Derivatives + manifest.json land here
//! overrides_file = "user_metadata.json"
//!
//! [images]
//! max_dimension = 2400            # Longer-side bound in pixels
//! quality = 85                    # WebP quality factor (1-100)
//! extensions = ["jpg", "jpeg", "png", "tif", "tiff", "webp"]
//!
//! [processing]
//! max_workers = 4                 # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only lower the quality factor
//! [images]
//! quality = 70
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Manifest filename inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Extension of every derivative the pipeline writes.
pub const DERIVATIVE_EXT: &str = "webp";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `picpress.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory of source photos (scanned non-recursively).
    pub source_dir: String,
    /// Directory receiving derivatives and the manifest.
    pub output_dir: String,
    /// Path to the user-authored metadata override document.
    pub overrides_file: String,
    /// Derivative generation settings (size bound, quality, eligibility).
    pub images: ImagesConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: "originals".to_string(),
            output_dir: "optimized".to_string(),
            overrides_file: "user_metadata.json".to_string(),
            images: ImagesConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "images.max_dimension must be non-zero".into(),
            ));
        }
        if self.images.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "images.extensions must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Path of the manifest document, inside the output directory.
    pub fn manifest_path(&self) -> PathBuf {
        Path::new(&self.output_dir).join(MANIFEST_FILE)
    }

    /// Derivative filename for a source filename: `<stem>.webp`.
    pub fn derivative_filename(filename: &str) -> String {
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);
        format!("{stem}.{DERIVATIVE_EXT}")
    }

    /// Full derivative path for a source filename.
    pub fn derivative_path(&self, filename: &str) -> PathBuf {
        Path::new(&self.output_dir).join(Self::derivative_filename(filename))
    }
}

/// Derivative generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Longer-side pixel bound; larger photos are downscaled to it.
    pub max_dimension: u32,
    /// WebP encoding quality factor (1 = worst, 100 = best).
    pub quality: u32,
    /// Source extensions eligible for processing (matched case-insensitively).
    pub extensions: Vec<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_dimension: 2400,
            quality: 85,
            extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "tif".to_string(),
                "tiff".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel transcode workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_workers: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_workers(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_workers.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load config from the given `picpress.toml` path.
///
/// Returns stock defaults when the file does not exist; rejects unknown keys
/// and validates the result when it does.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    if !path.exists() {
        return Ok(PipelineConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `picpress.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# picpress configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory of source photos. Only the top level is scanned.
source_dir = "originals"

# Directory receiving the optimized derivatives and manifest.json.
output_dir = "optimized"

# User-authored metadata overrides (JSON object keyed by source filename).
overrides_file = "user_metadata.json"

# ---------------------------------------------------------------------------
# Derivative generation
# ---------------------------------------------------------------------------
[images]
# Photos whose longer side exceeds this bound (in pixels) are downscaled
# so the longer side equals it. Smaller photos are never upscaled.
max_dimension = 2400

# WebP encoding quality factor (1 = worst, 100 = best).
quality = 85

# Source extensions eligible for processing, matched case-insensitively.
extensions = ["jpg", "jpeg", "png", "tif", "tiff", "webp"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel transcode workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_workers = 4
"##
}
