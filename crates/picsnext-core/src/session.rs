//! One editing session: the loaded image plus everything done to it.
//!
//! # Frames
//!
//! The decoded image is frame 0 and is never modified. Applying a crop copies
//! the selected region out of the current rotated frame into a new frame,
//! remembering the rotation that was baked into it. Each [`EditState`] names
//! the frame it renders from, so undoing a crop simply points back at the
//! earlier frame. Frames no longer referenced by any history entry are
//! dropped.
//!
//! # Async decoding
//!
//! Hosts that decode off the main thread call [`EditorSession::begin_load`]
//! to get a [`DecodeTicket`], then hand the result to
//! [`EditorSession::finish_load`]. Any later load or clear invalidates
//! earlier tickets, so a slow decode can never replace a newer image.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::buffer::PixelBuffer;
use crate::config::{ConfigError, EditorConfig};
use crate::crop_tool::{CropEngine, CropEvent, CropSettings};
use crate::decode::{load_source, DecodeError};
use crate::encode::{export_frame, EncodeError, ExportFormat};
use crate::geometry::{Point, Rect};
use crate::history::{HistoryEntry, HistoryStack};
use crate::metrics::PerformanceMetrics;
use crate::pipeline::{render_adjustments, RotationCache};
use crate::transform::{apply_crop, InvalidCropGeometry, Rotation};
use crate::viewport::{PanGesture, Viewport, ZoomLimits};
use crate::{EditChange, EditState, FrameId};

/// Errors surfaced by session operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("No image loaded")]
    NoImage,

    #[error("Decode result arrived after a newer load")]
    StaleDecode,

    #[error("No crop area defined")]
    NoCropArea,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Crop(#[from] InvalidCropGeometry),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Proof that a decode was started; only the most recent ticket is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeTicket(u64);

#[derive(Debug)]
struct Frame {
    buffer: PixelBuffer,
    /// Rotation already applied to `buffer`.
    baked: Rotation,
}

/// Editor state for a single image.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    frames: BTreeMap<FrameId, Frame>,
    next_frame: u32,
    history: HistoryStack<EditState>,
    viewport: Viewport,
    crop: CropEngine,
    pan: Option<PanGesture>,
    cache: RotationCache,
    generation: u64,
    metrics: PerformanceMetrics,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::from_valid_config(EditorConfig::default())
    }
}

impl EditorSession {
    /// A session with default settings and no image.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session with custom settings.
    pub fn with_config(config: EditorConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EditorConfig) -> Self {
        Self {
            frames: BTreeMap::new(),
            next_frame: 1,
            history: HistoryStack::with_capacity(config.history_capacity),
            viewport: Viewport::new(ZoomLimits::from_config(&config)),
            crop: CropEngine::new(0, 0, CropSettings::from_config(&config)),
            pan: None,
            cache: RotationCache::new(),
            generation: 0,
            metrics: PerformanceMetrics::new(),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The current edit state.
    pub fn state(&self) -> &EditState {
        self.history.present()
    }

    pub fn history(&self) -> &HistoryStack<EditState> {
        &self.history
    }

    /// Every history step with its action label, oldest first.
    pub fn history_entries(&self) -> impl Iterator<Item = HistoryEntry<'_, EditState>> {
        self.history.entries()
    }

    /// Index of the current step within [`history_entries`](Self::history_entries).
    pub fn history_index(&self) -> usize {
        self.history.current_index()
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut PerformanceMetrics {
        &mut self.metrics
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn crop_engine(&self) -> &CropEngine {
        &self.crop
    }

    pub fn has_image(&self) -> bool {
        self.frames.contains_key(&FrameId::SOURCE)
    }

    /// The image as decoded, before any edit.
    pub fn original(&self) -> Option<&PixelBuffer> {
        self.frames.get(&FrameId::SOURCE).map(|f| &f.buffer)
    }

    /// Number of working frames held (the original included).
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Size of the frame [`render`](Self::render) would produce.
    pub fn display_dimensions(&self) -> Option<(u32, u32)> {
        let state = self.history.present();
        let frame = self.frames.get(&state.frame)?;
        let delta = state.rotation.delta_from(frame.baked);
        Some(delta.rotated_dimensions(frame.buffer.width, frame.buffer.height))
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Decode `bytes` and make it the session image.
    ///
    /// On failure the current image and history are left untouched.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(u32, u32), SessionError> {
        let ticket = self.begin_load();
        self.finish_load(ticket, load_source(bytes))
    }

    /// Start an asynchronous load, invalidating any earlier ticket.
    pub fn begin_load(&mut self) -> DecodeTicket {
        self.generation += 1;
        DecodeTicket(self.generation)
    }

    /// Accept the result of the decode started with `ticket`.
    pub fn finish_load(
        &mut self,
        ticket: DecodeTicket,
        result: Result<PixelBuffer, DecodeError>,
    ) -> Result<(u32, u32), SessionError> {
        if ticket.0 != self.generation {
            tracing::warn!(
                ticket = ticket.0,
                current = self.generation,
                "discarding stale decode result"
            );
            return Err(SessionError::StaleDecode);
        }
        // A ticket is good for one result
        self.generation += 1;

        let buffer = result.map_err(|e| {
            tracing::debug!(error = %e, "load failed, keeping current image");
            e
        })?;
        let dimensions = buffer.dimensions();
        self.install(buffer);
        Ok(dimensions)
    }

    /// Use an already decoded buffer as the session image.
    pub fn set_source(&mut self, buffer: PixelBuffer) {
        self.generation += 1;
        self.install(buffer);
    }

    /// Drop the image, its history and any pending decode.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.frames.clear();
        self.next_frame = 1;
        self.history.replace_all(EditState::default());
        self.cache.invalidate();
        self.crop.set_bounds(0, 0);
        self.crop.reset();
        self.viewport.reset();
        self.pan = None;
        tracing::debug!("session cleared");
    }

    fn install(&mut self, buffer: PixelBuffer) {
        let (width, height) = buffer.dimensions();
        self.frames.clear();
        self.frames.insert(
            FrameId::SOURCE,
            Frame {
                buffer,
                baked: Rotation::Deg0,
            },
        );
        self.next_frame = 1;
        self.history.replace_all(EditState::default());
        self.cache.invalidate();
        self.crop = CropEngine::new(width, height, CropSettings::from_config(&self.config));
        self.viewport.reset();
        self.pan = None;
        tracing::debug!(width, height, "session image installed");
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Record a single-field edit.
    ///
    /// A rotation change also drops any pending crop area, whose coordinates
    /// belong to the old orientation. A ratio change shrinks a pending crop
    /// area to match. Either way the result is one history step.
    pub fn set(&mut self, change: EditChange) -> bool {
        let present = self.history.present();
        let mut extra = None;
        match change {
            EditChange::Rotation(rotation) if rotation != present.rotation => {
                self.crop.reset();
                if present.crop_area.is_some() {
                    extra = Some(EditChange::CropArea(None));
                }
            }
            EditChange::CropRatio(ratio) => {
                if let Some(adjusted) = self.crop.set_ratio(ratio) {
                    if present.crop_area.is_some() {
                        extra = Some(EditChange::CropArea(Some(adjusted)));
                    }
                }
            }
            _ => {}
        }

        let changed = match extra {
            Some(extra) => self.history.update([change, extra]),
            None => self.history.set(change),
        };
        self.after_history_change();
        changed
    }

    /// Record several edits as one history step.
    pub fn update<I>(&mut self, changes: I) -> bool
    where
        I: IntoIterator<Item = EditChange>,
    {
        let changed = self.history.update(changes);
        self.after_history_change();
        changed
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo();
        if changed {
            tracing::debug!(depth = self.history.past().count(), "undo");
        }
        self.after_history_change();
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo();
        if changed {
            tracing::debug!(depth = self.history.past().count(), "redo");
        }
        self.after_history_change();
        changed
    }

    /// Back to default adjustments on the original image, as an undoable step.
    pub fn reset(&mut self) -> bool {
        let changed = self.history.reset();
        self.after_history_change();
        changed
    }

    /// Forget undo and redo steps, keeping the current state.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.after_history_change();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn rotate_clockwise(&mut self) -> bool {
        self.set(EditChange::Rotation(self.state().rotation.clockwise()))
    }

    pub fn rotate_counter_clockwise(&mut self) -> bool {
        self.set(EditChange::Rotation(self.state().rotation.counter_clockwise()))
    }

    fn after_history_change(&mut self) {
        self.prune_frames();
        self.sync_crop_engine();
    }

    /// Drop working frames that no history entry renders from.
    fn prune_frames(&mut self) {
        let referenced: BTreeSet<FrameId> = self.history.iter().map(|s| s.frame).collect();
        let before = self.frames.len();
        self.frames
            .retain(|id, _| *id == FrameId::SOURCE || referenced.contains(id));
        let dropped = before - self.frames.len();
        if dropped > 0 {
            self.cache.invalidate();
            tracing::debug!(dropped, "pruned unreferenced frames");
        }
    }

    /// Make the crop engine show what the current state says.
    fn sync_crop_engine(&mut self) {
        let state = self.history.present();
        let (width, height) = match self.display_dimensions() {
            Some(dims) => dims,
            None => (0, 0),
        };
        self.crop.set_bounds(width, height);
        self.crop.reset();
        self.crop.set_ratio(state.crop_ratio);
        self.crop.restore(state.crop_area);
    }

    // ------------------------------------------------------------------
    // Rendering and export
    // ------------------------------------------------------------------

    /// Render the current state.
    pub fn render(&mut self) -> Result<PixelBuffer, SessionError> {
        let state = self.history.present();
        let frame = self.frames.get(&state.frame).ok_or(SessionError::NoImage)?;
        let delta = state.rotation.delta_from(frame.baked);
        let rotated = self.cache.rotated(state.frame, &frame.buffer, delta);
        Ok(render_adjustments(rotated, state))
    }

    /// Render the current state and encode it.
    pub fn export(&mut self, format: ExportFormat) -> Result<Vec<u8>, SessionError> {
        let frame = self.render()?;
        Ok(export_frame(&frame, format)?)
    }

    // ------------------------------------------------------------------
    // Cropping
    // ------------------------------------------------------------------

    pub fn crop_pointer_down(&mut self, screen: Point) -> CropEvent {
        self.crop.pointer_down(screen, &self.viewport)
    }

    /// Returns the rectangle to draw while dragging.
    pub fn crop_pointer_move(&mut self, screen: Point) -> Option<Rect> {
        self.crop.pointer_move(screen, &self.viewport)
    }

    /// Finish a crop gesture, recording the resulting area in history.
    pub fn crop_pointer_up(&mut self, screen: Point) -> CropEvent {
        let event = self.crop.pointer_up(screen, &self.viewport);
        match event {
            CropEvent::Defined(rect) => {
                self.history.set(EditChange::CropArea(Some(rect)));
            }
            CropEvent::Discarded => {
                self.history.set(EditChange::CropArea(None));
            }
            CropEvent::None => return event,
        }
        self.after_history_change();
        event
    }

    /// Discard the crop rectangle.
    pub fn cancel_crop(&mut self) -> CropEvent {
        let event = self.crop.cancel();
        self.history.set(EditChange::CropArea(None));
        self.after_history_change();
        event
    }

    /// Cut the defined crop area out of the current frame.
    ///
    /// Returns the size of the new frame.
    pub fn apply_crop(&mut self) -> Result<(u32, u32), SessionError> {
        let state = self.history.present().clone();
        let frame = self.frames.get(&state.frame).ok_or(SessionError::NoImage)?;
        let rect = self
            .crop
            .take_applied()
            .or(state.crop_area)
            .ok_or(SessionError::NoCropArea)?;

        let delta = state.rotation.delta_from(frame.baked);
        let rotated = self.cache.rotated(state.frame, &frame.buffer, delta);
        let cropped = match apply_crop(rotated, &rect) {
            Ok(cropped) => cropped,
            Err(e) => {
                tracing::debug!(error = %e, "crop rejected");
                self.crop.reset();
                return Err(e.into());
            }
        };

        let id = FrameId(self.next_frame);
        self.next_frame += 1;
        let dimensions = cropped.dimensions();
        self.frames.insert(
            id,
            Frame {
                buffer: cropped,
                baked: state.rotation,
            },
        );

        if state.crop_area != Some(rect) {
            self.history.set(EditChange::CropArea(Some(rect)));
        }
        self.history.apply_crop(id);
        tracing::debug!(
            frame = id.0,
            width = dimensions.0,
            height = dimensions.1,
            "crop applied"
        );
        self.after_history_change();
        Ok(dimensions)
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.viewport.set_zoom(zoom)
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.viewport.zoom_out()
    }

    /// Zoom keeping the image point under `cursor` in place.
    pub fn zoom_at(&mut self, cursor: Point, zoom: f64) -> f64 {
        self.viewport.zoom_at(cursor, zoom)
    }

    pub fn wheel_zoom(&mut self, cursor: Point, delta_y: f64) -> f64 {
        self.viewport.wheel_zoom(cursor, delta_y)
    }

    /// Fit the rendered frame into a container of the given size.
    pub fn fit_to_container(&mut self, width: f64, height: f64) -> f64 {
        match self.display_dimensions() {
            Some((w, h)) => self.viewport.fit_zoom(w, h, width, height),
            None => self.viewport.zoom(),
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
    }

    pub fn begin_pan(&mut self, pointer: Point) {
        self.pan = Some(PanGesture::begin(&self.viewport, pointer));
    }

    /// Returns false when no pan gesture is active.
    pub fn pan_move(&mut self, pointer: Point) -> bool {
        match self.pan {
            Some(gesture) => {
                gesture.update(&mut self.viewport, pointer);
                true
            }
            None => false,
        }
    }

    pub fn end_pan(&mut self) {
        self.pan = None;
    }
}
