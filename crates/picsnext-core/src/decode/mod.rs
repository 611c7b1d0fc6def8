//! Turning encoded image bytes into a [`PixelBuffer`](crate::PixelBuffer).
//!
//! PNG, JPEG, WebP, GIF (first frame) and BMP are accepted. Any EXIF
//! orientation tag is applied during decoding, so the buffer is always
//! upright. Decoding never touches editor state; a failed decode leaves the
//! caller's current image alone.

mod source;
mod types;

pub use source::{load_source, read_orientation};
pub use types::{DecodeError, Orientation};
