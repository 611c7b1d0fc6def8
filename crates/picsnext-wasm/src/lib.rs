//! PicsNext WASM - WebAssembly bindings for the PicsNext editor
//!
//! This crate exposes the picsnext-core editing engine to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for RGBA pixel buffers
//! - `decode` - Image decoding with EXIF orientation correction
//! - `encode` - PNG and JPEG export
//! - `render` - Stateless rendering, rotation, crop and preset filters
//! - `session` - Stateful editor with history, viewport and crop tool
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditorSession } from '@picsnext/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsEditorSession();
//! session.load(new Uint8Array(await file.arrayBuffer()));
//! session.set_filter('sepia');
//! const png = session.export_png();
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod render;
mod session;
mod types;

// Re-export public types
pub use decode::{decode_image, exif_orientation};
pub use encode::{encode_buffer, encode_jpeg, encode_png};
pub use render::{
    apply_crop, apply_preset_filter, apply_rotation, crop_ratios, preset_filters, render_frame,
};
pub use session::{JsDecodeTicket, JsEditorSession};
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
