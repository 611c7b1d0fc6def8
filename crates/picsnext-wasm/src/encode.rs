//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_png`] - Encode RGBA pixel data to PNG bytes
//! - [`encode_jpeg`] - Encode RGBA pixel data to JPEG bytes (alpha dropped)
//! - [`encode_buffer`] - Encode a JsPixelBuffer in a format given as an object
//!
//! # Example
//!
//! ```typescript
//! import { encode_png, encode_buffer } from '@picsnext/wasm';
//!
//! const png = encode_png(pixels, width, height);
//! const jpeg = encode_buffer(frame, { format: 'jpeg', quality: 85 });
//! await writable.write(new Blob([jpeg], { type: 'image/jpeg' }));
//! ```

use crate::types::{to_js_error, JsPixelBuffer};
use picsnext_core::encode::{self, ExportFormat};
use wasm_bindgen::prelude::*;

/// Encode RGBA pixel data to PNG bytes.
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(to_js_error)
}

/// Encode RGBA pixel data to JPEG bytes.
///
/// * `quality` - JPEG quality (1-100, recommended: 90)
#[wasm_bindgen]
pub fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality).map_err(to_js_error)
}

/// Encode a buffer in the given format.
///
/// `format` is `{ format: "png" }` or `{ format: "jpeg", quality: 90 }`;
/// `undefined` means PNG.
#[wasm_bindgen]
pub fn encode_buffer(image: &JsPixelBuffer, format: JsValue) -> Result<Vec<u8>, JsValue> {
    let format: ExportFormat = if format.is_undefined() || format.is_null() {
        ExportFormat::default()
    } else {
        serde_wasm_bindgen::from_value(format).map_err(to_js_error)?
    };
    encode::export_frame(image.as_core(), format).map_err(to_js_error)
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use picsnext_core::PixelBuffer;
    use serde::Serialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct JpegFormat {
        format: &'static str,
        quality: u8,
    }

    #[wasm_bindgen_test]
    fn test_encode_png_invalid_dimensions() {
        assert!(encode_png(&[], 0, 10).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_jpeg_invalid_pixel_data() {
        // RGB-sized data for an RGBA encoder
        let pixels = vec![128u8; 50 * 50 * 3];
        assert!(encode_jpeg(&pixels, 50, 50, 90).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_buffer_default_is_png() {
        let img = JsPixelBuffer::from_core(PixelBuffer::filled(4, 4, [1, 2, 3, 4]));
        let bytes = encode_buffer(&img, JsValue::UNDEFINED).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[wasm_bindgen_test]
    fn test_encode_buffer_jpeg() {
        let img = JsPixelBuffer::from_core(PixelBuffer::filled(4, 4, [1, 2, 3, 4]));
        let format = serde_wasm_bindgen::to_value(&JpegFormat {
            format: "jpeg",
            quality: 70,
        })
        .unwrap();
        let bytes = encode_buffer(&img, format).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[wasm_bindgen_test]
    fn test_encode_buffer_unknown_format() {
        let img = JsPixelBuffer::from_core(PixelBuffer::filled(4, 4, [1, 2, 3, 4]));
        let format = serde_wasm_bindgen::to_value(&JpegFormat {
            format: "tiff",
            quality: 70,
        })
        .unwrap();
        assert!(encode_buffer(&img, format).is_err());
    }
}
