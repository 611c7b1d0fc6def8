//! Decoding with EXIF orientation correction.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageReader};

use super::{DecodeError, Orientation};
use crate::buffer::PixelBuffer;

/// Decode image bytes into an upright RGBA buffer.
///
/// # Errors
///
/// - `EmptyInput` for a zero-length slice
/// - `UnsupportedFormat` when the format cannot be recognized or is not enabled
/// - `CorruptedFile` when the data is truncated or malformed
/// - `InvalidDimensions` when the decoder reports a zero-sized image
pub fn load_source(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    let Some(format) = reader.format() else {
        tracing::debug!(len = bytes.len(), "decode: unrecognized format");
        return Err(DecodeError::UnsupportedFormat);
    };

    let img = reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::UnsupportedFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })?;
    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::InvalidDimensions);
    }

    let orientation = read_orientation(bytes);
    let upright = apply_orientation(img, orientation);
    let buffer = PixelBuffer::from_rgba_image(upright.into_rgba8());

    tracing::debug!(
        ?format,
        ?orientation,
        width = buffer.width,
        height = buffer.height,
        "decoded source image"
    );
    Ok(buffer)
}

/// EXIF orientation of the image in `bytes`.
///
/// Returns `Orientation::Normal` if there is no EXIF data or no orientation tag.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
