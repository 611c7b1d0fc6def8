//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode PNG, JPEG, WebP, GIF or BMP bytes into an RGBA buffer
//! - [`exif_orientation`] - Read the EXIF orientation tag (1-8)
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@picsnext/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::{to_js_error, JsPixelBuffer};
use picsnext_core::decode;
use wasm_bindgen::prelude::*;

/// Decode image bytes into an upright RGBA buffer.
///
/// EXIF orientation is applied, so the result can be drawn as is.
///
/// # Errors
///
/// Returns an error if the input is empty, the format is not supported, or
/// the data is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    decode::load_source(bytes)
        .map(JsPixelBuffer::from_core)
        .map_err(to_js_error)
}

/// EXIF orientation value (1-8) of the image, 1 when absent.
#[wasm_bindgen]
pub fn exif_orientation(bytes: &[u8]) -> u8 {
    decode::read_orientation(bytes) as u8
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_invalid_bytes() {
        assert!(decode_image(&[0x00, 0x01, 0x02, 0x03]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }
}
