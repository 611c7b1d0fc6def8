//! PicsNext Core - Image adjustment and edit history engine
//!
//! This crate provides the editing core for PicsNext: a non-destructive
//! pixel pipeline (rotation, color adjustment, preset filters, blur),
//! interactive cropping, viewport mapping and a linear undo/redo history.

pub mod adjustments;
pub mod blur;
pub mod buffer;
pub mod config;
pub mod crop_tool;
pub mod decode;
pub mod encode;
pub mod filters;
pub mod geometry;
pub mod history;
pub mod metrics;
pub mod pipeline;
pub mod session;
pub mod transform;
pub mod viewport;

pub use buffer::{BufferError, DimensionMismatch, PixelBuffer};
pub use config::{ConfigError, EditorConfig};
pub use crop_tool::{CropEngine, CropEvent, CropPhase, CropRatio, Handle};
pub use decode::{load_source, DecodeError};
pub use encode::{export_frame, EncodeError, ExportFormat};
pub use filters::PresetFilter;
pub use geometry::{Point, Rect};
pub use history::{HistoryEntry, HistoryStack};
pub use metrics::PerformanceMetrics;
pub use pipeline::render_frame;
pub use session::{DecodeTicket, EditorSession, SessionError};
pub use transform::Rotation;
pub use viewport::Viewport;

/// Brightness slider range.
pub const BRIGHTNESS_RANGE: (i32, i32) = (-100, 100);
/// Contrast slider range.
pub const CONTRAST_RANGE: (i32, i32) = (-100, 100);
/// Largest saturation percentage.
pub const MAX_SATURATION: u32 = 200;

/// Identifies a working frame: 0 is the loaded image, each applied crop adds one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct FrameId(pub u32);

impl FrameId {
    /// The frame produced by loading an image.
    pub const SOURCE: FrameId = FrameId(0);
}

/// Every user-adjustable setting, as one immutable value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditState {
    /// Additive brightness (-100 to 100)
    pub brightness: i32,
    /// Contrast (-100 to 100)
    pub contrast: i32,
    /// Saturation percentage (0 to 200, 100 = unchanged)
    pub saturation: u32,
    /// Blur amount (0 to 100)
    pub blur: u32,
    /// Clockwise rotation
    pub rotation: Rotation,
    /// Preset color filter
    pub filter: PresetFilter,
    /// Aspect ratio constraint for cropping
    pub crop_ratio: CropRatio,
    /// Pending crop rectangle in rendered-frame coordinates
    pub crop_area: Option<Rect>,
    /// Working frame this state renders from
    pub frame: FrameId,
}

impl Default for EditState {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 0,
            saturation: adjustments::NEUTRAL_SATURATION,
            blur: 0,
            rotation: Rotation::Deg0,
            filter: PresetFilter::None,
            crop_ratio: CropRatio::Free,
            crop_area: None,
            frame: FrameId::SOURCE,
        }
    }
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this state with one field replaced. Values are clamped into range.
    pub fn with_change(&self, change: EditChange) -> EditState {
        let mut next = self.clone();
        match change {
            EditChange::Brightness(v) => {
                next.brightness = v.clamp(BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1)
            }
            EditChange::Contrast(v) => next.contrast = v.clamp(CONTRAST_RANGE.0, CONTRAST_RANGE.1),
            EditChange::Saturation(v) => next.saturation = v.min(MAX_SATURATION),
            EditChange::Blur(v) => next.blur = v.min(blur::MAX_BLUR),
            EditChange::Rotation(r) => next.rotation = r,
            EditChange::Filter(f) => next.filter = f,
            EditChange::CropRatio(r) => next.crop_ratio = r,
            EditChange::CropArea(area) => next.crop_area = area,
        }
        next
    }

    /// Check if no color or blur adjustment is active.
    pub fn is_neutral(&self) -> bool {
        self.brightness == 0
            && self.contrast == 0
            && self.saturation == adjustments::NEUTRAL_SATURATION
            && self.blur == 0
            && self.filter == PresetFilter::None
    }
}

/// A single-field edit.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum EditChange {
    Brightness(i32),
    Contrast(i32),
    Saturation(u32),
    Blur(u32),
    Rotation(Rotation),
    Filter(PresetFilter),
    CropRatio(CropRatio),
    CropArea(Option<Rect>),
}

impl EditChange {
    /// Field name, used in logs and as the history step label.
    pub fn label(&self) -> &'static str {
        match self {
            EditChange::Brightness(_) => "brightness",
            EditChange::Contrast(_) => "contrast",
            EditChange::Saturation(_) => "saturation",
            EditChange::Blur(_) => "blur",
            EditChange::Rotation(_) => "rotation",
            EditChange::Filter(_) => "filter",
            EditChange::CropRatio(_) => "cropRatio",
            EditChange::CropArea(_) => "cropArea",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_state_default() {
        let state = EditState::new();
        assert_eq!(state.saturation, 100);
        assert_eq!(state.rotation, Rotation::Deg0);
        assert_eq!(state.crop_ratio, CropRatio::Free);
        assert_eq!(state.frame, FrameId::SOURCE);
        assert!(state.is_neutral());
    }

    #[test]
    fn test_with_change_leaves_original() {
        let state = EditState::new();
        let next = state.with_change(EditChange::Brightness(30));
        assert_eq!(state.brightness, 0);
        assert_eq!(next.brightness, 30);
        assert!(!next.is_neutral());
    }

    #[test]
    fn test_with_change_clamps() {
        let state = EditState::new();
        assert_eq!(state.with_change(EditChange::Brightness(150)).brightness, 100);
        assert_eq!(state.with_change(EditChange::Contrast(-300)).contrast, -100);
        assert_eq!(state.with_change(EditChange::Saturation(999)).saturation, 200);
        assert_eq!(state.with_change(EditChange::Blur(101)).blur, 100);
    }

    #[test]
    fn test_change_label() {
        assert_eq!(EditChange::CropArea(None).label(), "cropArea");
        assert_eq!(EditChange::Filter(PresetFilter::Hdr).label(), "filter");
    }

    #[test]
    fn test_frame_id_ordering() {
        assert!(FrameId::SOURCE < FrameId(1));
        assert_eq!(FrameId::default(), FrameId::SOURCE);
    }
}
