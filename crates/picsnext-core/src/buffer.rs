//! RGBA pixel storage shared by every stage of the editing pipeline.

use thiserror::Error;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Errors raised when constructing or combining pixel buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Pixel data length doesn't match `width * height * 4`.
    #[error("Pixel data length mismatch: expected {expected} bytes (width * height * 4), got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Two buffers that were expected to share dimensions do not.
///
/// This is an internal invariant violation, never a user-facing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
pub struct DimensionMismatch {
    pub expected: (u32, u32),
    pub actual: (u32, u32),
}

/// An owned RGBA raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length is always width * height * 4.
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer, asserting (in debug builds) that the data length matches.
    ///
    /// Use [`PixelBuffer::try_new`] for data coming from outside the crate.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            byte_len(width, height),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a buffer, validating the data length.
    pub fn try_new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BufferError> {
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a buffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an `image::RgbaImage` for encoding.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Width and height as a tuple.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Read one pixel. Returns `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let p = &self.pixels[idx..idx + CHANNELS];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Check that `other` has the same dimensions as `self`.
    pub fn ensure_same_dimensions(&self, other: &PixelBuffer) -> Result<(), DimensionMismatch> {
        if self.dimensions() == other.dimensions() {
            Ok(())
        } else {
            Err(DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            })
        }
    }

    /// Produce a new buffer of the same size by mapping every pixel.
    ///
    /// The closure receives `[r, g, b, a]` and returns the new pixel.
    pub fn map_pixels<F>(&self, mut f: F) -> PixelBuffer
    where
        F: FnMut([u8; 4]) -> [u8; 4],
    {
        let mut output = Vec::with_capacity(self.pixels.len());
        for chunk in self.pixels.chunks_exact(CHANNELS) {
            output.extend_from_slice(&f([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels: output,
        }
    }
}

#[inline]
fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

/// Round and clamp a channel value to a byte.
#[inline]
pub(crate) fn to_channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}
