//! Copying a rectangular region out of a buffer.
//!
//! Crop rectangles are in pixel coordinates of the buffer being cropped.
//! The origin is floored and the size is floored, so a rectangle of
//! `20.7 × 10.2` always yields a `20 × 10` buffer when it lies inside the
//! image.

use thiserror::Error;

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::geometry::Rect;

/// The rectangle collapses to nothing once clamped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Invalid crop geometry: {rect:?} within {width}x{height}")]
pub struct InvalidCropGeometry {
    pub rect: Rect,
    pub width: u32,
    pub height: u32,
}

/// Copy `rect` out of `image` into a new, smaller buffer.
///
/// # Behavior
///
/// - Output size is `floor(rect.width) × floor(rect.height)`, reduced only
///   where the rectangle extends past the image edge
/// - A rectangle with no pixels inside the image is an error
///
/// # Example
///
/// ```
/// use picsnext_core::{geometry::Rect, transform::apply_crop, PixelBuffer};
///
/// let image = PixelBuffer::filled(100, 100, [128, 128, 128, 255]);
/// let cropped = apply_crop(&image, &Rect::new(25.0, 25.0, 50.0, 50.0)).unwrap();
/// assert_eq!(cropped.dimensions(), (50, 50));
/// ```
pub fn apply_crop(image: &PixelBuffer, rect: &Rect) -> Result<PixelBuffer, InvalidCropGeometry> {
    let invalid = || InvalidCropGeometry {
        rect: *rect,
        width: image.width,
        height: image.height,
    };

    let finite = [rect.x, rect.y, rect.width, rect.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite || !rect.has_area() {
        return Err(invalid());
    }

    let px_left = rect.x.max(0.0).floor() as u64;
    let px_top = rect.y.max(0.0).floor() as u64;
    let px_width = rect.width.floor() as u64;
    let px_height = rect.height.floor() as u64;

    // Clamp to image bounds
    let px_right = (px_left + px_width).min(image.width as u64);
    let px_bottom = (px_top + px_height).min(image.height as u64);
    if px_right <= px_left || px_bottom <= px_top {
        return Err(invalid());
    }

    let out_width = (px_right - px_left) as u32;
    let out_height = (px_bottom - px_top) as u32;
    let row_bytes = out_width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    // Copy pixel data row by row
    for y in 0..out_height {
        let start = image.index(px_left as u32, px_top as u32 + y);
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    Ok(PixelBuffer::new(out_width, out_height, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
