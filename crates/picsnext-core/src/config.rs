//! Editor tunables.
//!
//! All fields have defaults, so a host may pass a partial object (for
//! example `{ "history_capacity": 50 }`) and get sensible values for the rest.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("history_capacity must be at least 1")]
    ZeroHistoryCapacity,

    #[error("Invalid zoom range: min {min} must be positive and below max {max}")]
    InvalidZoomRange { min: f64, max: f64 },

    #[error("zoom_step must be positive, got {0}")]
    InvalidZoomStep(f64),

    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("jpeg_quality must be between 1 and 100, got {0}")]
    InvalidJpegQuality(u8),
}

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept; older steps are dropped.
    pub history_capacity: usize,
    /// Smallest zoom factor.
    pub min_zoom: f64,
    /// Largest zoom factor.
    pub max_zoom: f64,
    /// Zoom increment for stepping and snapping.
    pub zoom_step: f64,
    /// Corner handle hit radius, in screen pixels.
    pub handle_radius: f64,
    /// Handles are only hit-tested when the crop rect is at least this big (image px).
    pub handle_min_rect: f64,
    /// Smallest crop width/height while resizing (image px).
    pub min_crop_size: f64,
    /// Default JPEG export quality.
    pub jpeg_quality: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            min_zoom: 0.1,
            max_zoom: 8.0,
            zoom_step: 0.1,
            handle_radius: 15.0,
            handle_min_rect: 20.0,
            min_crop_size: 10.0,
            jpeg_quality: 90,
        }
    }
}

impl EditorConfig {
    /// Check that the values are consistent with each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if !(self.min_zoom > 0.0 && self.min_zoom < self.max_zoom && self.max_zoom.is_finite()) {
            return Err(ConfigError::InvalidZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !(self.zoom_step > 0.0 && self.zoom_step.is_finite()) {
            return Err(ConfigError::InvalidZoomStep(self.zoom_step));
        }
        for (name, value) in [
            ("handle_radius", self.handle_radius),
            ("handle_min_rect", self.handle_min_rect),
            ("min_crop_size", self.min_crop_size),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidJpegQuality(self.jpeg_quality));
        }
        Ok(())
    }
}
