//! Stateless rendering WASM bindings.
//!
//! These run a single pipeline stage, or the whole pipeline, on a buffer
//! without a session. Hosts that keep their own history can use them
//! directly; [`JsEditorSession`](crate::JsEditorSession) is the stateful route.

use crate::types::{to_js_error, JsPixelBuffer};
use picsnext_core::filters::apply_preset;
use picsnext_core::transform::{apply_crop as core_crop, apply_rotation as core_rotate};
use picsnext_core::{pipeline, CropRatio, EditState, PresetFilter, Rect, Rotation};
use wasm_bindgen::prelude::*;

/// Render an edit state (as a plain object) onto `image`.
///
/// Missing fields take their defaults, so `{ brightness: 20 }` is valid.
/// `cropArea` and `frame` are ignored here.
#[wasm_bindgen]
pub fn render_frame(image: &JsPixelBuffer, state: JsValue) -> Result<JsPixelBuffer, JsValue> {
    let state: EditState = serde_wasm_bindgen::from_value(state).map_err(to_js_error)?;
    Ok(JsPixelBuffer::from_core(pipeline::render_frame(image.as_core(), &state)))
}

/// Rotate clockwise by 0, 90, 180 or 270 degrees (any multiple of 90 is normalized).
#[wasm_bindgen]
pub fn apply_rotation(image: &JsPixelBuffer, degrees: i32) -> Result<JsPixelBuffer, JsValue> {
    let rotation = Rotation::from_degrees(degrees).map_err(to_js_error)?;
    Ok(JsPixelBuffer::from_core(core_rotate(image.as_core(), rotation)))
}

/// Copy a pixel rectangle out of `image`.
#[wasm_bindgen]
pub fn apply_crop(
    image: &JsPixelBuffer,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Result<JsPixelBuffer, JsValue> {
    core_crop(image.as_core(), &Rect::new(x, y, width, height))
        .map(JsPixelBuffer::from_core)
        .map_err(to_js_error)
}

/// Apply a preset filter by name (`"sepia"`, `"hdr"`, ...).
#[wasm_bindgen]
pub fn apply_preset_filter(image: &JsPixelBuffer, name: &str) -> Result<JsPixelBuffer, JsValue> {
    let filter: PresetFilter = name.parse().map_err(to_js_error)?;
    Ok(JsPixelBuffer::from_core(apply_preset(image.as_core(), filter)))
}

/// Names of all preset filters, in display order.
#[wasm_bindgen]
pub fn preset_filters() -> Vec<String> {
    PresetFilter::ALL.iter().map(|f| f.name().to_string()).collect()
}

/// Crop ratios offered by the editor (`"free"`, `"1:1"`, ...).
#[wasm_bindgen]
pub fn crop_ratios() -> Vec<String> {
    CropRatio::PRESETS.iter().map(|r| r.to_string()).collect()
}
