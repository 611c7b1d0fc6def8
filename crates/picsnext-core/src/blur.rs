//! Separable Gaussian blur.
//!
//! The blur amount is a slider value from 0 to 100. Any non-zero amount maps
//! to a Gaussian standard deviation of `0.5 + amount / 10` pixels, so the
//! first slider step already softens a hard edge and the maximum setting
//! blurs with sigma = 10.5px. The kernel extends three sigmas on each side
//! and edge pixels are clamped (extended) rather than treated as transparent.
//!
//! All four channels are blurred.

use crate::buffer::{PixelBuffer, CHANNELS};

/// Largest accepted blur amount.
pub const MAX_BLUR: u32 = 100;

/// Smallest standard deviation used for a non-zero amount.
const BASE_SIGMA: f32 = 0.5;

/// Standard deviation in pixels for a blur amount; 0 means no blur.
#[inline]
pub fn blur_sigma(amount: u32) -> f32 {
    if amount == 0 {
        return 0.0;
    }
    BASE_SIGMA + amount.min(MAX_BLUR) as f32 / 10.0
}

/// Blur a buffer, producing a new one.
///
/// # Arguments
/// * `buffer` - Source pixels
/// * `amount` - Blur amount, 0 to 100 (0 = unchanged)
///
/// # Example
/// ```
/// use picsnext_core::{blur::apply_blur, PixelBuffer};
///
/// let img = PixelBuffer::filled(8, 8, [10, 20, 30, 255]);
/// // A flat image is unchanged by any blur.
/// assert_eq!(apply_blur(&img, 50), img);
/// ```
pub fn apply_blur(buffer: &PixelBuffer, amount: u32) -> PixelBuffer {
    if amount == 0 || buffer.is_empty() {
        return buffer.clone();
    }

    let kernel = gaussian_kernel(blur_sigma(amount));
    let mut tmp = vec![0f32; buffer.pixels.len()];
    let mut output = vec![0u8; buffer.pixels.len()];

    horizontal_pass(&buffer.pixels, &mut tmp, buffer.width, buffer.height, &kernel);
    vertical_pass(&tmp, &mut output, buffer.width, buffer.height, &kernel);

    PixelBuffer::new(buffer.width, buffer.height, output)
}

/// Normalized 1-D Gaussian weights, centered at `kernel.len() / 2`.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as i32;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| {
            let x = i as f32;
            (-x * x / denom).exp()
        })
        .collect();

    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

// Intermediate results stay in f32 so the two passes round only once.
fn horizontal_pass(src: &[u8], dst: &mut [f32], width: u32, height: u32, kernel: &[f32]) {
    let radius = (kernel.len() / 2) as i64;
    let w = width as i64;

    for y in 0..height as i64 {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = [0f32; CHANNELS];
            for (ki, &weight) in kernel.iter().enumerate() {
                let sx = (x + ki as i64 - radius).clamp(0, w - 1);
                let idx = (row + sx as usize) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += weight * src[idx + c] as f32;
                }
            }
            let out_idx = (row + x as usize) * CHANNELS;
            dst[out_idx..out_idx + CHANNELS].copy_from_slice(&acc);
        }
    }
}

fn vertical_pass(src: &[f32], dst: &mut [u8], width: u32, height: u32, kernel: &[f32]) {
    let radius = (kernel.len() / 2) as i64;
    let w = width as usize;
    let h = height as i64;

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f32; CHANNELS];
            for (ki, &weight) in kernel.iter().enumerate() {
                let sy = (y + ki as i64 - radius).clamp(0, h - 1) as usize;
                let idx = (sy * w + x) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += weight * src[idx + c];
                }
            }
            let out_idx = (y as usize * w + x) * CHANNELS;
            for c in 0..CHANNELS {
                dst[out_idx + c] = acc[c].clamp(0.0, 255.0).round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Black image with a single white pixel in the middle.
    fn impulse(size: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::filled(size, size, [0, 0, 0, 255]);
        let idx = buf.index(size / 2, size / 2);
        buf.pixels[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
        buf
    }

    /// Vertical black/white stripes, one pixel wide.
    fn stripes(size: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for _y in 0..size {
            for x in 0..size {
                let v = if x % 2 == 0 { 0 } else { 255 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        PixelBuffer::new(size, size, pixels)
    }

    /// Left half black, right half white.
    fn step_edge(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _y in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 0 } else { 255 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        PixelBuffer::new(width, height, pixels)
    }

    /// Sum of squared differences between horizontally adjacent red values.
    fn roughness(buf: &PixelBuffer) -> u64 {
        let mut total = 0u64;
        for y in 0..buf.height {
            for x in 1..buf.width {
                let a = buf.pixel(x - 1, y).unwrap()[0] as i64;
                let b = buf.pixel(x, y).unwrap()[0] as i64;
                total += ((a - b) * (a - b)) as u64;
            }
        }
        total
    }

    #[test]
    fn test_zero_is_identity() {
        let img = stripes(16);
        assert_eq!(apply_blur(&img, 0), img);
    }

    #[test]
    fn test_flat_image_unchanged() {
        let img = PixelBuffer::filled(12, 9, [90, 120, 200, 255]);
        assert_eq!(apply_blur(&img, 100), img);
    }

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(2.5);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(k.len() % 2, 1);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-7);
        }
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let img = impulse(21);
        let out = apply_blur(&img, 20);
        let center = out.pixel(10, 10).unwrap()[0];
        let neighbor = out.pixel(11, 10).unwrap()[0];
        assert!(center < 255, "Center should lose energy");
        assert!(neighbor > 0, "Neighbor should gain energy");
    }

    #[test]
    fn test_larger_amount_blurs_more() {
        let img = step_edge(96, 4);
        let mut previous = roughness(&img);
        for amount in [1, 2, 3, 5, 10, 20, 40, 100] {
            let r = roughness(&apply_blur(&img, amount));
            assert!(r < previous, "amount {amount}: {r} !< {previous}");
            previous = r;
        }
    }

    #[test]
    fn test_smallest_amount_softens_edge() {
        let img = step_edge(16, 4);
        let out = apply_blur(&img, 1);
        assert_ne!(out, img);
        // The dark pixel next to the edge picks up some of the white side
        assert!(out.pixel(7, 0).unwrap()[0] > 0);
        assert!(out.pixel(8, 0).unwrap()[0] < 255);
    }

    #[test]
    fn test_sigma_mapping() {
        assert_eq!(blur_sigma(0), 0.0);
        assert!((blur_sigma(1) - 0.6).abs() < 1e-6);
        assert!(blur_sigma(2) > blur_sigma(1));
        assert_eq!(blur_sigma(500), blur_sigma(MAX_BLUR));
    }

    #[test]
    fn test_dimensions_preserved() {
        let img = stripes(10);
        let out = apply_blur(&img, 30);
        assert_eq!(out.dimensions(), img.dimensions());
    }

    #[test]
    fn test_amount_is_capped() {
        let img = impulse(15);
        assert_eq!(apply_blur(&img, 250), apply_blur(&img, 100));
    }
}
