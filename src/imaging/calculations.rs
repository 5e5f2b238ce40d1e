//! Pure dimension math for the downscale step.
//!
//! No I/O and no pixels, so the rounding behavior is testable on its own.

/// Calculate the dimensions that fit `source` within `bound` on the longer
/// edge, preserving aspect ratio.
///
/// Returns `None` when the image already fits and no resize is needed.
/// Rounded edges are clamped to at least 1 pixel so extreme aspect ratios
/// (panoramas, film strips) never collapse to a zero dimension.
///
/// # Examples
/// ```
/// # use picpress::imaging::fit_within;
/// // 4000x3000 bounded to 2400 → 2400x1800
/// assert_eq!(fit_within((4000, 3000), 2400), Some((2400, 1800)));
///
/// // Already small enough → no resize
/// assert_eq!(fit_within((1200, 800), 2400), None);
/// ```
pub fn fit_within(source: (u32, u32), bound: u32) -> Option<(u32, u32)> {
    let (w, h) = source;
    let longer = w.max(h);
    if longer <= bound {
        return None;
    }

    let ratio = bound as f64 / longer as f64;
    if w >= h {
        // Landscape or square: width is the longer edge
        let scaled_h = ((h as f64 * ratio).round() as u32).max(1);
        Some((bound, scaled_h))
    } else {
        // Portrait: height is the longer edge
        let scaled_w = ((w as f64 * ratio).round() as u32).max(1);
        Some((scaled_w, bound))
    }
}
