//! Brightness, contrast and saturation.
//!
//! ## Adjustment Order
//! 1. Brightness (additive offset)
//! 2. Contrast (259/255 curve around 128)
//! 3. Saturation (luma-weighted gray, computed from the contrast-adjusted pixel)
//!
//! Every stage works on unclamped `f32` values; clamping and rounding happen
//! once at the end. Alpha is copied from the source pixel.

use crate::buffer::{to_channel, PixelBuffer};

/// Largest contrast magnitude for which the curve is defined.
const MAX_CONTRAST: f32 = 254.0;

/// Saturation value that leaves colors unchanged.
pub const NEUTRAL_SATURATION: u32 = 100;

/// Apply brightness, contrast and saturation to `original`, producing a new buffer.
///
/// # Arguments
/// * `original` - Source RGBA pixels (never modified)
/// * `brightness` - Additive offset, -100 to 100
/// * `contrast` - Contrast, -100 to 100 (0 = unchanged)
/// * `saturation` - Percentage, 0 to 200 (100 = unchanged, 0 = grayscale)
///
/// # Example
/// ```
/// use picsnext_core::{adjustments::apply_color_adjustment, PixelBuffer};
///
/// let gray = PixelBuffer::filled(1, 1, [100, 100, 100, 255]);
/// let brighter = apply_color_adjustment(&gray, 50, 0, 100);
/// assert_eq!(brighter.pixels, vec![150, 150, 150, 255]);
/// ```
pub fn apply_color_adjustment(
    original: &PixelBuffer,
    brightness: i32,
    contrast: i32,
    saturation: u32,
) -> PixelBuffer {
    // Early exit if no adjustments
    if brightness == 0 && contrast == 0 && saturation == NEUTRAL_SATURATION {
        return original.clone();
    }

    let brightness = brightness as f32;
    let factor = contrast_factor(contrast as f32);
    let saturation = saturation as f32 / 100.0;

    original.map_pixels(|[r, g, b, a]| {
        let (mut r, mut g, mut b) = (r as f32, g as f32, b as f32);

        (r, g, b) = apply_brightness(r, g, b, brightness);
        (r, g, b) = apply_contrast(r, g, b, factor);
        (r, g, b) = apply_saturation(r, g, b, saturation);

        [to_channel(r), to_channel(g), to_channel(b), a]
    })
}

/// Contrast multiplier for the 259/255 curve.
///
/// `factor = 259 * (c + 255) / (255 * (259 - c))`. The input is clamped to
/// ±254 so the denominator never reaches zero.
#[inline]
pub fn contrast_factor(contrast: f32) -> f32 {
    let c = contrast.clamp(-MAX_CONTRAST, MAX_CONTRAST);
    (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
}

/// Gray value used by the saturation stage (ITU-R BT.601 weights).
#[inline]
pub fn saturation_gray(r: f32, g: f32, b: f32) -> f32 {
    0.2989 * r + 0.5870 * g + 0.1140 * b
}

#[inline]
fn apply_brightness(r: f32, g: f32, b: f32, brightness: f32) -> (f32, f32, f32) {
    (r + brightness, g + brightness, b + brightness)
}

#[inline]
fn apply_contrast(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    (
        factor * (r - 128.0) + 128.0,
        factor * (g - 128.0) + 128.0,
        factor * (b - 128.0) + 128.0,
    )
}

/// `scale` is the saturation percentage divided by 100.
#[inline]
fn apply_saturation(r: f32, g: f32, b: f32, scale: f32) -> (f32, f32, f32) {
    let gray = saturation_gray(r, g, b);
    (
        gray + scale * (r - gray),
        gray + scale * (g - gray),
        gray + scale * (b - gray),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(r: u8, g: u8, b: u8, a: u8) -> PixelBuffer {
        PixelBuffer::new(1, 1, vec![r, g, b, a])
    }

    fn apply(buf: &PixelBuffer, brightness: i32, contrast: i32, saturation: u32) -> Vec<u8> {
        apply_color_adjustment(buf, brightness, contrast, saturation).pixels
    }

    // ===== Identity Tests =====

    #[test]
    fn test_identity_no_adjustments() {
        let buf = pixel(128, 64, 192, 200);
        assert_eq!(apply(&buf, 0, 0, 100), buf.pixels);
    }

    #[test]
    fn test_contrast_factor_is_one_at_zero() {
        assert_eq!(contrast_factor(0.0), 1.0);
    }

    #[test]
    fn test_contrast_factor_defined_at_extremes() {
        assert!(contrast_factor(-255.0).is_finite());
        assert!(contrast_factor(259.0).is_finite());
    }

    // ===== Brightness Tests =====

    #[test]
    fn test_brightness_adds_offset() {
        let buf = pixel(10, 100, 200, 255);
        assert_eq!(apply(&buf, 50, 0, 100), vec![60, 150, 250, 255]);
    }

    #[test]
    fn test_brightness_clamps() {
        let buf = pixel(10, 100, 250, 255);
        assert_eq!(apply(&buf, -100, 0, 100), vec![0, 0, 150, 255]);
        assert_eq!(apply(&buf, 100, 0, 100), vec![110, 200, 255, 255]);
    }

    // ===== Contrast Tests =====

    #[test]
    fn test_contrast_positive_spreads_from_midpoint() {
        let buf = pixel(64, 128, 192, 255);
        let result = apply(&buf, 0, 50, 100);
        assert!(result[0] < 64, "Dark channel should get darker");
        assert_eq!(result[1], 128, "Midpoint is fixed");
        assert!(result[2] > 192, "Bright channel should get brighter");
    }

    #[test]
    fn test_contrast_negative_pulls_toward_midpoint() {
        let buf = pixel(0, 128, 255, 255);
        let result = apply(&buf, 0, -50, 100);
        assert!(result[0] > 0);
        assert_eq!(result[1], 128);
        assert!(result[2] < 255);
    }

    #[test]
    fn test_contrast_known_value() {
        // factor(100) = 259 * 355 / (255 * 159) = 2.2676...
        // 64 -> 2.2676 * (64 - 128) + 128 = -17.1 -> 0
        // 160 -> 2.2676 * 32 + 128 = 200.56 -> 201
        let buf = pixel(64, 160, 128, 255);
        assert_eq!(apply(&buf, 0, 100, 100), vec![0, 201, 128, 255]);
    }

    // ===== Saturation Tests =====

    #[test]
    fn test_saturation_zero_is_grayscale() {
        let buf = pixel(200, 100, 50, 255);
        let result = apply(&buf, 0, 0, 0);
        // 0.2989*200 + 0.587*100 + 0.114*50 = 124.18
        assert_eq!(result, vec![124, 124, 124, 255]);
    }

    #[test]
    fn test_saturation_uses_contrast_adjusted_gray() {
        let buf = pixel(200, 100, 50, 255);
        let result = apply(&buf, 0, 50, 0);
        let factor = contrast_factor(50.0);
        let c = |v: f32| factor * (v - 128.0) + 128.0;
        let gray = saturation_gray(c(200.0), c(100.0), c(50.0));
        let expected = to_channel(gray);
        assert_eq!(result, vec![expected, expected, expected, 255]);
    }

    #[test]
    fn test_saturation_double_increases_spread() {
        let buf = pixel(150, 100, 100, 255);
        let result = apply(&buf, 0, 0, 200);
        assert!(result[0] > 150);
        assert!(result[1] < 100);
    }

    #[test]
    fn test_alpha_is_preserved() {
        let buf = pixel(10, 20, 30, 77);
        let result = apply(&buf, 80, 40, 150);
        assert_eq!(result[3], 77);
    }

    #[test]
    fn test_dimensions_are_preserved() {
        let buf = PixelBuffer::filled(7, 3, [90, 80, 70, 255]);
        let result = apply_color_adjustment(&buf, 10, 10, 10);
        assert_eq!(result.dimensions(), (7, 3));
        assert_eq!(result.pixels.len(), buf.pixels.len());
    }

    #[test]
    fn test_does_not_modify_original() {
        let buf = pixel(100, 100, 100, 255);
        let _ = apply_color_adjustment(&buf, 100, 100, 200);
        assert_eq!(buf.pixels, vec![100, 100, 100, 255]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
