//! Mapping between screen coordinates and image pixel coordinates.
//!
//! The rendered frame is drawn unscaled at `pan` (its on-screen top-left)
//! and magnified by `zoom`, so:
//!
//! ```text
//! image  = (screen - pan) / zoom
//! screen = image * zoom + pan
//! ```
//!
//! Zoom and pan are display state only and never enter the edit history.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::geometry::Point;

/// Convert a screen point to image space.
///
/// `origin` is the on-screen position of the image's top-left pixel.
#[inline]
pub fn to_image_space(screen: Point, origin: Point, zoom: f64) -> Point {
    Point::new((screen.x - origin.x) / zoom, (screen.y - origin.y) / zoom)
}

/// Convert an image point to screen space (inverse of [`to_image_space`]).
#[inline]
pub fn to_screen_space(image: Point, origin: Point, zoom: f64) -> Point {
    Point::new(image.x * zoom + origin.x, image.y * zoom + origin.y)
}

/// Allowed zoom range and step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 8.0,
            step: 0.1,
        }
    }
}

impl ZoomLimits {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            min: config.min_zoom,
            max: config.max_zoom,
            step: config.zoom_step,
        }
    }

    /// Snap to the nearest step, then clamp into range.
    pub fn snap(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return 1.0_f64.clamp(self.min, self.max);
        }
        let steps_per_unit = 1.0 / self.step;
        let snapped = (zoom * steps_per_unit).round() / steps_per_unit;
        snapped.clamp(self.min, self.max)
    }

    /// Largest step multiple not above `zoom`, clamped into range.
    fn snap_down(&self, zoom: f64) -> f64 {
        let steps_per_unit = 1.0 / self.step;
        // Small epsilon so 0.3 / 0.1 = 2.9999999 still counts as 3 steps.
        let snapped = (zoom * steps_per_unit + 1e-9).floor() / steps_per_unit;
        snapped.clamp(self.min, self.max)
    }
}

/// Zoom and pan for the on-screen view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan: Point,
    limits: ZoomLimits,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}

impl Viewport {
    /// A 1:1 view with the image at the screen origin.
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            zoom: 1.0_f64.clamp(limits.min, limits.max),
            pan: Point::ORIGIN,
            limits,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// On-screen position of the image's top-left pixel.
    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Equivalent scroll position of a scrolling container (`-pan`).
    pub fn scroll_offset(&self) -> Point {
        Point::new(-self.pan.x, -self.pan.y)
    }

    /// Set the zoom (snapped and clamped), keeping the pan unchanged.
    /// Returns the zoom actually applied.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.zoom = self.limits.snap(zoom);
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + self.limits.step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - self.limits.step)
    }

    /// Pan is unconstrained; the image may be dragged fully off screen.
    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = Point::new(self.pan.x + dx, self.pan.y + dy);
    }

    /// Back to 1:1 at the screen origin.
    pub fn reset(&mut self) {
        *self = Viewport::new(self.limits);
    }

    pub fn screen_to_image(&self, screen: Point) -> Point {
        to_image_space(screen, self.pan, self.zoom)
    }

    pub fn image_to_screen(&self, image: Point) -> Point {
        to_screen_space(image, self.pan, self.zoom)
    }

    /// Re-derive the pan so the anchored content point sits under its cursor
    /// again at the current zoom.
    ///
    /// Call after the zoom has changed; a host that only learns the new
    /// on-screen geometry on the next frame can hold the anchor until then.
    pub fn settle(&mut self, anchor: ZoomAnchor) {
        self.pan = Point::new(
            anchor.cursor.x - anchor.content.x * self.zoom,
            anchor.cursor.y - anchor.content.y * self.zoom,
        );
    }

    /// Zoom while keeping the image point under `cursor` fixed on screen.
    pub fn zoom_at(&mut self, cursor: Point, zoom: f64) -> f64 {
        let anchor = ZoomAnchor::capture(self, cursor);
        self.set_zoom(zoom);
        self.settle(anchor);
        self.zoom
    }

    /// Scroll-wheel zoom: one step in for negative `delta_y`, out for positive.
    pub fn wheel_zoom(&mut self, cursor: Point, delta_y: f64) -> f64 {
        if delta_y == 0.0 {
            return self.zoom;
        }
        let direction = if delta_y < 0.0 { 1.0 } else { -1.0 };
        self.zoom_at(cursor, self.zoom + direction * self.limits.step)
    }

    /// Zoom so a `image_w × image_h` frame fits inside the container, centered.
    pub fn fit_zoom(&mut self, image_w: u32, image_h: u32, container_w: f64, container_h: f64) -> f64 {
        if image_w == 0 || image_h == 0 || container_w <= 0.0 || container_h <= 0.0 {
            return self.zoom;
        }
        let ratio = (container_w / image_w as f64).min(container_h / image_h as f64);
        self.zoom = self.limits.snap_down(ratio);
        self.pan = Point::new(
            (container_w - image_w as f64 * self.zoom) / 2.0,
            (container_h - image_h as f64 * self.zoom) / 2.0,
        );
        self.zoom
    }
}

/// The content point under the cursor, captured before a zoom change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnchor {
    pub cursor: Point,
    pub content: Point,
}

impl ZoomAnchor {
    pub fn capture(viewport: &Viewport, cursor: Point) -> Self {
        Self {
            cursor,
            content: viewport.screen_to_image(cursor),
        }
    }
}

/// A drag-to-pan gesture. Lives from pointer-down to pointer-up only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    start_pointer: Point,
    start_pan: Point,
}

impl PanGesture {
    pub fn begin(viewport: &Viewport, pointer: Point) -> Self {
        Self {
            start_pointer: pointer,
            start_pan: viewport.pan(),
        }
    }

    /// Move the view so the grabbed point follows the pointer.
    pub fn update(&self, viewport: &mut Viewport, pointer: Point) {
        let (dx, dy) = self.start_pointer.delta_to(pointer);
        viewport.set_pan(Point::new(self.start_pan.x + dx, self.start_pan.y + dy));
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the point under the cursor stays under it across any zoom.
        #[test]
        fn prop_zoom_at_preserves_anchor(
            start_zoom in 0.1f64..=8.0,
            target_zoom in 0.0f64..=10.0,
            pan in (-500.0f64..500.0, -500.0f64..500.0),
            cursor in (0.0f64..1000.0, 0.0f64..1000.0),
        ) {
            let mut vp = Viewport::default();
            vp.set_zoom(start_zoom);
            vp.set_pan(Point::new(pan.0, pan.1));
            let cursor = Point::new(cursor.0, cursor.1);
            let before = vp.screen_to_image(cursor);

            vp.zoom_at(cursor, target_zoom);

            let after = vp.image_to_screen(before);
            prop_assert!((after.x - cursor.x).abs() < 1e-6);
            prop_assert!((after.y - cursor.y).abs() < 1e-6);
        }

        /// Property: zoom always lands within the limits.
        #[test]
        fn prop_zoom_within_limits(zoom in -100.0f64..100.0) {
            let mut vp = Viewport::default();
            let z = vp.set_zoom(zoom);
            prop_assert!((0.1 - 1e-12..=8.0 + 1e-12).contains(&z));
        }
    }
}
