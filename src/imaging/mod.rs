//! Image processing — pure Rust decode, libwebp encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** (JPEG, PNG, TIFF, WebP) | `image` crate |
//! | **Orientation** | `image` flip/rotate ops |
//! | **Downscale** | Lanczos3 `resize_exact` |
//! | **Encode** | `webp` crate, lossy quality factor |
//!
//! The module is split into:
//! - **Calculations**: pure functions for dimension math (unit testable)
//! - **Codec**: decode / orient / downscale / encode against real files

mod calculations;
pub mod codec;

pub use calculations::fit_within;
pub use codec::{
    ImagingError, apply_orientation, downscale_to_fit, encode_webp, load_image, write_atomic,
};
