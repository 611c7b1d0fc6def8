//! Encoding a rendered frame for download.
//!
//! PNG is the default export format and keeps the alpha channel. JPEG
//! drops alpha and takes a quality setting from 1 to 100.
//!
//! # Examples
//!
//! ```ignore
//! use picsnext_core::{encode::{export_frame, ExportFormat}, PixelBuffer};
//!
//! let frame = PixelBuffer::filled(64, 64, [128, 128, 128, 255]);
//! let png = export_frame(&frame, ExportFormat::Png).unwrap();
//! ```

mod jpeg;
mod png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::{PixelBuffer, CHANNELS};

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Errors that can occur while encoding a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output format for [`export_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg {
        /// 1-100, clamped
        quality: u8,
    },
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg { .. } => "image/jpeg",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg { .. } => "jpg",
        }
    }
}

/// Encode `frame` in the requested format.
pub fn export_frame(frame: &PixelBuffer, format: ExportFormat) -> Result<Vec<u8>, EncodeError> {
    let bytes = match format {
        ExportFormat::Png => encode_png(&frame.pixels, frame.width, frame.height)?,
        ExportFormat::Jpeg { quality } => encode_jpeg(&frame.pixels, frame.width, frame.height, quality)?,
    };
    tracing::debug!(
        format = format.extension(),
        width = frame.width,
        height = frame.height,
        bytes = bytes.len(),
        "exported frame"
    );
    Ok(bytes)
}

/// Check dimensions and RGBA data length before handing pixels to an encoder.
fn validate_rgba(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = (width as usize) * (height as usize) * CHANNELS;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}
