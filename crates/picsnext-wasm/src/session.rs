//! Editing session WASM bindings.
//!
//! [`JsEditorSession`] owns the loaded image, its edit history, the viewport
//! and the crop tool. The presentation layer forwards slider changes and
//! pointer events, then calls `render()` to get the frame to draw.
//!
//! # Example
//!
//! ```typescript
//! import { JsEditorSession } from '@picsnext/wasm';
//!
//! const session = JsEditorSession.with_config({ history_capacity: 50 });
//! session.load(new Uint8Array(await file.arrayBuffer()));
//! session.set_brightness(20);
//! const frame = session.render();
//! ctx.putImageData(new ImageData(frame.image_data(), frame.width), 0, 0);
//! ```

use crate::types::{to_js_error, JsPixelBuffer};
use picsnext_core::session::{DecodeTicket, EditorSession, SessionError};
use picsnext_core::{
    CropEvent, CropRatio, DecodeError, EditChange, EditorConfig, ExportFormat, Point,
    PresetFilter, Rect, Rotation,
};
use wasm_bindgen::prelude::*;

/// Ticket for a decode started with `begin_load`.
#[wasm_bindgen]
pub struct JsDecodeTicket {
    inner: DecodeTicket,
}

/// Editing session wrapper for JavaScript.
#[wasm_bindgen]
pub struct JsEditorSession {
    inner: EditorSession,
}

fn event_name(event: CropEvent) -> String {
    match event {
        CropEvent::None => "none",
        CropEvent::Defined(_) => "defined",
        CropEvent::Discarded => "discarded",
    }
    .to_string()
}

fn rect_to_vec(rect: Rect) -> Vec<f64> {
    vec![rect.x, rect.y, rect.width, rect.height]
}

impl Default for JsEditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsEditorSession {
    /// Create a session with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: EditorSession::new(),
        }
    }

    /// Create a session from a (partial) config object.
    pub fn with_config(config: JsValue) -> Result<JsEditorSession, JsValue> {
        let config: EditorConfig = serde_wasm_bindgen::from_value(config).map_err(to_js_error)?;
        EditorSession::with_config(config)
            .map(|inner| Self { inner })
            .map_err(to_js_error)
    }

    /// The active config as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(to_js_error)
    }

    // --- loading ---

    /// Decode and load image bytes. On failure the current image is kept.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.load(bytes).map(|_| ()).map_err(to_js_error)
    }

    /// Start a load whose decode happens elsewhere (e.g. in a worker).
    pub fn begin_load(&mut self) -> JsDecodeTicket {
        JsDecodeTicket {
            inner: self.inner.begin_load(),
        }
    }

    /// Hand over the decoded image for `ticket`. Fails if a newer load started.
    pub fn finish_load(&mut self, ticket: JsDecodeTicket, image: JsPixelBuffer) -> Result<(), JsValue> {
        self.inner
            .finish_load(ticket.inner, Ok(image.into_core()))
            .map(|_| ())
            .map_err(to_js_error)
    }

    /// Report that the decode for `ticket` failed, keeping the current image.
    ///
    /// Returns false if the ticket was already stale.
    pub fn fail_load(&mut self, ticket: JsDecodeTicket, message: String) -> bool {
        let result = self
            .inner
            .finish_load(ticket.inner, Err(DecodeError::CorruptedFile(message)));
        !matches!(result, Err(SessionError::StaleDecode))
    }

    /// Drop the image and any pending load.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    /// Width of the rendered frame, 0 without an image.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.display_dimensions().map_or(0, |(w, _)| w)
    }

    /// Height of the rendered frame, 0 without an image.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.display_dimensions().map_or(0, |(_, h)| h)
    }

    // --- adjustments ---

    pub fn set_brightness(&mut self, value: i32) -> bool {
        self.inner.set(EditChange::Brightness(value))
    }

    pub fn set_contrast(&mut self, value: i32) -> bool {
        self.inner.set(EditChange::Contrast(value))
    }

    pub fn set_saturation(&mut self, value: u32) -> bool {
        self.inner.set(EditChange::Saturation(value))
    }

    pub fn set_blur(&mut self, value: u32) -> bool {
        self.inner.set(EditChange::Blur(value))
    }

    pub fn set_rotation(&mut self, degrees: i32) -> Result<bool, JsValue> {
        let rotation = Rotation::from_degrees(degrees).map_err(to_js_error)?;
        Ok(self.inner.set(EditChange::Rotation(rotation)))
    }

    pub fn rotate_clockwise(&mut self) -> bool {
        self.inner.rotate_clockwise()
    }

    pub fn rotate_counter_clockwise(&mut self) -> bool {
        self.inner.rotate_counter_clockwise()
    }

    pub fn set_filter(&mut self, name: &str) -> Result<bool, JsValue> {
        let filter: PresetFilter = name.parse().map_err(to_js_error)?;
        Ok(self.inner.set(EditChange::Filter(filter)))
    }

    pub fn set_crop_ratio(&mut self, ratio: &str) -> Result<bool, JsValue> {
        let ratio: CropRatio = ratio.parse().map_err(to_js_error)?;
        Ok(self.inner.set(EditChange::CropRatio(ratio)))
    }

    /// The current edit state as a plain object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.state()).map_err(to_js_error)
    }

    // --- history ---

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    pub fn reset(&mut self) -> bool {
        self.inner.reset()
    }

    pub fn clear_history(&mut self) {
        self.inner.clear_history();
    }

    /// Action label of every history step, oldest first.
    pub fn history_labels(&self) -> Vec<String> {
        self.inner
            .history_entries()
            .map(|entry| entry.label.to_string())
            .collect()
    }

    /// Index of the current step within `history_labels()`.
    #[wasm_bindgen(getter)]
    pub fn history_index(&self) -> usize {
        self.inner.history_index()
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    // --- performance metrics (timestamps from `performance.now()`) ---

    pub fn record_frame(&mut self, timestamp_ms: f64) {
        self.inner.metrics_mut().record_frame(timestamp_ms);
    }

    pub fn begin_interaction(&mut self, timestamp_ms: f64, kind: String) {
        self.inner.metrics_mut().begin_interaction(timestamp_ms, kind);
    }

    /// Latency of the interaction just finished, if one was pending.
    pub fn end_interaction(&mut self, timestamp_ms: f64) -> Option<f64> {
        self.inner.metrics_mut().end_interaction(timestamp_ms)
    }

    #[wasm_bindgen(getter)]
    pub fn fps(&self) -> u32 {
        self.inner.metrics().fps()
    }

    #[wasm_bindgen(getter)]
    pub fn average_latency(&self) -> f64 {
        self.inner.metrics().average_latency()
    }

    #[wasm_bindgen(getter)]
    pub fn current_latency(&self) -> f64 {
        self.inner.metrics().current_latency()
    }

    pub fn reset_metrics(&mut self) {
        self.inner.metrics_mut().reset();
    }

    // --- rendering ---

    pub fn render(&mut self) -> Result<JsPixelBuffer, JsValue> {
        self.inner
            .render()
            .map(JsPixelBuffer::from_core)
            .map_err(to_js_error)
    }

    pub fn export_png(&mut self) -> Result<Vec<u8>, JsValue> {
        self.inner.export(ExportFormat::Png).map_err(to_js_error)
    }

    /// Export as JPEG; without `quality` the configured default is used.
    pub fn export_jpeg(&mut self, quality: Option<u8>) -> Result<Vec<u8>, JsValue> {
        let quality = quality.unwrap_or(self.inner.config().jpeg_quality);
        self.inner
            .export(ExportFormat::Jpeg { quality })
            .map_err(to_js_error)
    }

    // --- cropping (screen coordinates) ---

    pub fn crop_pointer_down(&mut self, x: f64, y: f64) -> String {
        event_name(self.inner.crop_pointer_down(Point::new(x, y)))
    }

    /// Returns `[x, y, width, height]` of the rectangle to draw, if any.
    pub fn crop_pointer_move(&mut self, x: f64, y: f64) -> Option<Vec<f64>> {
        self.inner.crop_pointer_move(Point::new(x, y)).map(rect_to_vec)
    }

    /// Returns `"defined"`, `"discarded"` or `"none"`.
    pub fn crop_pointer_up(&mut self, x: f64, y: f64) -> String {
        event_name(self.inner.crop_pointer_up(Point::new(x, y)))
    }

    /// `[x, y, width, height]` of the crop rectangle in image pixels, if any.
    pub fn crop_rect(&self) -> Option<Vec<f64>> {
        self.inner.crop_engine().rect().map(rect_to_vec)
    }

    pub fn cancel_crop(&mut self) -> String {
        event_name(self.inner.cancel_crop())
    }

    pub fn apply_crop(&mut self) -> Result<(), JsValue> {
        self.inner.apply_crop().map(|_| ()).map_err(to_js_error)
    }

    // --- viewport ---

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.viewport().zoom()
    }

    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f64 {
        self.inner.viewport().pan().x
    }

    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f64 {
        self.inner.viewport().pan().y
    }

    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.inner.set_zoom(zoom)
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.inner.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.inner.zoom_out()
    }

    pub fn zoom_at(&mut self, x: f64, y: f64, zoom: f64) -> f64 {
        self.inner.zoom_at(Point::new(x, y), zoom)
    }

    pub fn wheel_zoom(&mut self, x: f64, y: f64, delta_y: f64) -> f64 {
        self.inner.wheel_zoom(Point::new(x, y), delta_y)
    }

    pub fn fit_to_container(&mut self, width: f64, height: f64) -> f64 {
        self.inner.fit_to_container(width, height)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.inner.pan_by(dx, dy);
    }

    pub fn begin_pan(&mut self, x: f64, y: f64) {
        self.inner.begin_pan(Point::new(x, y));
    }

    pub fn pan_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pan_move(Point::new(x, y))
    }

    pub fn end_pan(&mut self) {
        self.inner.end_pan();
    }

    /// Map a screen point to image pixels, returned as `[x, y]`.
    pub fn to_image_space(&self, x: f64, y: f64) -> Vec<f64> {
        let p = self.inner.viewport().screen_to_image(Point::new(x, y));
        vec![p.x, p.y]
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Serialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct PartialConfig {
        history_capacity: usize,
    }

    #[wasm_bindgen_test]
    fn test_with_partial_config() {
        let config = serde_wasm_bindgen::to_value(&PartialConfig {
            history_capacity: 5,
        })
        .unwrap();
        assert!(JsEditorSession::with_config(config).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_with_invalid_config() {
        let config = serde_wasm_bindgen::to_value(&PartialConfig {
            history_capacity: 0,
        })
        .unwrap();
        assert!(JsEditorSession::with_config(config).is_err());
    }

    #[wasm_bindgen_test]
    fn test_render_without_image_fails() {
        let mut session = JsEditorSession::new();
        assert!(session.render().is_err());
    }

    #[wasm_bindgen_test]
    fn test_stale_ticket_rejected() {
        let mut session = JsEditorSession::new();
        let first = session.begin_load();
        let _second = session.begin_load();
        let image = JsPixelBuffer::from_core(picsnext_core::PixelBuffer::filled(2, 2, [0, 0, 0, 255]));
        assert!(session.finish_load(first, image).is_err());
        assert!(!session.has_image());
    }

    #[wasm_bindgen_test]
    fn test_bad_names_rejected() {
        let mut session = JsEditorSession::new();
        assert!(session.set_filter("lomo").is_err());
        assert!(session.set_crop_ratio("wide").is_err());
        assert!(session.set_rotation(45).is_err());
    }

    #[wasm_bindgen_test]
    fn test_state_object() {
        let mut session = JsEditorSession::new();
        session.set_contrast(25);
        let state: picsnext_core::EditState =
            serde_wasm_bindgen::from_value(session.state().unwrap()).unwrap();
        assert_eq!(state.contrast, 25);
    }
}
