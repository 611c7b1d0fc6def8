//! Interactive crop rectangle editing.
//!
//! [`CropEngine`] turns pointer events into a crop rectangle in image space:
//!
//! ```text
//! Idle ──down──▶ Drawing ──up (has area)──▶ Defined ──take_applied──▶ Idle
//!                  │                          │  ▲
//!                  └─up (empty)──▶ Idle       │  └──up── Moving / Resizing
//!                                             └─down on rect / handle ─┘
//! ```
//!
//! Pointer positions arrive in screen space and are mapped through the
//! [`Viewport`] first. The engine never touches pixels; applying the
//! rectangle is the session's job.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EditorConfig;
use crate::geometry::{Point, Rect};
use crate::viewport::Viewport;

/// Error returned when a crop ratio string is not `free` or `W:H`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown crop ratio: {0:?}")]
pub struct ParseCropRatioError(pub String);

/// Aspect-ratio constraint for the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CropRatio {
    #[default]
    Free,
    Ratio { width: u32, height: u32 },
}

impl CropRatio {
    /// Ratios offered by the editor UI.
    pub const PRESETS: [CropRatio; 5] = [
        CropRatio::Free,
        CropRatio::Ratio { width: 1, height: 1 },
        CropRatio::Ratio { width: 4, height: 3 },
        CropRatio::Ratio { width: 16, height: 9 },
        CropRatio::Ratio { width: 3, height: 2 },
    ];

    /// `width / height`, or `None` when unconstrained.
    pub fn aspect(self) -> Option<f64> {
        match self {
            CropRatio::Free => None,
            CropRatio::Ratio { width, height } => Some(width as f64 / height as f64),
        }
    }
}

impl fmt::Display for CropRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropRatio::Free => f.write_str("free"),
            CropRatio::Ratio { width, height } => write!(f, "{width}:{height}"),
        }
    }
}

impl FromStr for CropRatio {
    type Err = ParseCropRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("free") {
            return Ok(CropRatio::Free);
        }
        let err = || ParseCropRatioError(s.to_string());
        let (w, h) = trimmed.split_once(':').ok_or_else(err)?;
        let width: u32 = w.trim().parse().map_err(|_| err())?;
        let height: u32 = h.trim().parse().map_err(|_| err())?;
        if width == 0 || height == 0 {
            return Err(err());
        }
        Ok(CropRatio::Ratio { width, height })
    }
}

impl TryFrom<String> for CropRatio {
    type Error = ParseCropRatioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CropRatio> for String {
    fn from(ratio: CropRatio) -> Self {
        ratio.to_string()
    }
}

/// Shrink one side of `width × height` so the ratio matches `aspect`.
///
/// Wider than the target shrinks the width, otherwise the height.
pub fn constrain_to_aspect(width: f64, height: f64, aspect: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (width.max(0.0), height.max(0.0));
    }
    if width / height > aspect {
        (height * aspect, height)
    } else {
        (width, width / aspect)
    }
}

/// Corner handles of the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Handle {
    pub const ALL: [Handle; 4] = [Handle::Nw, Handle::Ne, Handle::Sw, Handle::Se];

    fn is_west(self) -> bool {
        matches!(self, Handle::Nw | Handle::Sw)
    }

    fn is_north(self) -> bool {
        matches!(self, Handle::Nw | Handle::Ne)
    }

    /// Position of this corner on `rect`.
    pub fn corner(self, rect: &Rect) -> Point {
        Point::new(
            if self.is_west() { rect.x } else { rect.right() },
            if self.is_north() { rect.y } else { rect.bottom() },
        )
    }

    /// The diagonally opposite corner, which stays put while resizing.
    pub fn opposite(self) -> Handle {
        match self {
            Handle::Nw => Handle::Se,
            Handle::Ne => Handle::Sw,
            Handle::Sw => Handle::Ne,
            Handle::Se => Handle::Nw,
        }
    }
}

/// Where the engine is in its gesture cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropPhase {
    Idle,
    Drawing { anchor: Point },
    Defined,
    Moving { start: Point, origin: Rect },
    Resizing { handle: Handle, start: Point, origin: Rect },
}

/// What a pointer handler wants recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropEvent {
    /// Nothing to record.
    None,
    /// A gesture finished with this rectangle.
    Defined(Rect),
    /// The rectangle was dropped.
    Discarded,
}

/// Hit-testing and sizing tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSettings {
    /// Handle radius in screen pixels.
    pub handle_radius: f64,
    /// Handles are only hit-tested on rectangles at least this big.
    pub handle_min_rect: f64,
    /// Resizing never shrinks a side below this.
    pub min_size: f64,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl CropSettings {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            handle_radius: config.handle_radius,
            handle_min_rect: config.handle_min_rect,
            min_size: config.min_crop_size,
        }
    }
}

/// Crop rectangle state machine.
#[derive(Debug, Clone)]
pub struct CropEngine {
    bounds: (f64, f64),
    ratio: CropRatio,
    rect: Option<Rect>,
    phase: CropPhase,
    settings: CropSettings,
}

impl CropEngine {
    /// An idle engine for a `width × height` frame.
    pub fn new(width: u32, height: u32, settings: CropSettings) -> Self {
        Self {
            bounds: (width as f64, height as f64),
            ratio: CropRatio::Free,
            rect: None,
            phase: CropPhase::Idle,
            settings,
        }
    }

    pub fn phase(&self) -> CropPhase {
        self.phase
    }

    /// The rectangle being drawn or edited, if any.
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn ratio(&self) -> CropRatio {
        self.ratio
    }

    pub fn bounds(&self) -> (f64, f64) {
        self.bounds
    }

    /// True while a pointer gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(
            self.phase,
            CropPhase::Drawing { .. } | CropPhase::Moving { .. } | CropPhase::Resizing { .. }
        )
    }

    /// Change the frame size. Any rectangle is dropped if the size changed.
    pub fn set_bounds(&mut self, width: u32, height: u32) {
        let bounds = (width as f64, height as f64);
        if bounds != self.bounds {
            self.bounds = bounds;
            self.reset();
        }
    }

    /// Show `rect` as the defined rectangle (or clear it), e.g. after undo.
    ///
    /// Ignored while a gesture is in progress.
    pub fn restore(&mut self, rect: Option<Rect>) {
        if self.is_dragging() {
            return;
        }
        match rect.map(|r| r.clamp_to(self.bounds.0, self.bounds.1)) {
            Some(r) if r.has_area() => {
                self.rect = Some(r);
                self.phase = CropPhase::Defined;
            }
            _ => self.reset(),
        }
    }

    /// Switch the ratio. A defined rectangle is shrunk to match, keeping its
    /// top-left corner; the adjusted rectangle is returned.
    pub fn set_ratio(&mut self, ratio: CropRatio) -> Option<Rect> {
        self.ratio = ratio;
        let aspect = ratio.aspect()?;
        if self.phase != CropPhase::Defined {
            return None;
        }
        let rect = self.rect?;
        let (w, h) = constrain_to_aspect(rect.width, rect.height, aspect);
        let adjusted = Rect::new(rect.x, rect.y, w, h);
        if adjusted.has_area() {
            self.rect = Some(adjusted);
            Some(adjusted)
        } else {
            self.reset();
            None
        }
    }

    /// Drop any rectangle and return to Idle.
    pub fn reset(&mut self) {
        self.rect = None;
        self.phase = CropPhase::Idle;
    }

    pub fn pointer_down(&mut self, screen: Point, viewport: &Viewport) -> CropEvent {
        let p = viewport.screen_to_image(screen);

        if let (CropPhase::Defined, Some(rect)) = (self.phase, self.rect) {
            if let Some(handle) = self.hit_handle(p, &rect, viewport.zoom()) {
                tracing::trace!(?handle, "crop resize start");
                self.phase = CropPhase::Resizing {
                    handle,
                    start: p,
                    origin: rect,
                };
                return CropEvent::None;
            }
            if rect.contains(p) {
                tracing::trace!("crop move start");
                self.phase = CropPhase::Moving {
                    start: p,
                    origin: rect,
                };
                return CropEvent::None;
            }
        }

        let anchor = self.clamp_point(p);
        tracing::trace!(x = anchor.x, y = anchor.y, "crop draw start");
        self.rect = Some(Rect::new(anchor.x, anchor.y, 0.0, 0.0));
        self.phase = CropPhase::Drawing { anchor };
        CropEvent::None
    }

    /// Update the gesture; returns the rectangle to display.
    pub fn pointer_move(&mut self, screen: Point, viewport: &Viewport) -> Option<Rect> {
        let p = viewport.screen_to_image(screen);
        match self.phase {
            CropPhase::Idle | CropPhase::Defined => {}
            CropPhase::Drawing { anchor } => {
                self.rect = Some(self.drawn_rect(anchor, p));
            }
            CropPhase::Moving { start, origin } => {
                let (dx, dy) = start.delta_to(p);
                let moved = Rect::new(origin.x + dx, origin.y + dy, origin.width, origin.height);
                self.rect = Some(moved.translate_within(self.bounds.0, self.bounds.1));
            }
            CropPhase::Resizing {
                handle,
                start,
                origin,
            } => {
                self.rect = Some(self.resized_rect(handle, start, origin, p));
            }
        }
        self.rect
    }

    /// Finish the gesture at `screen`.
    pub fn pointer_up(&mut self, screen: Point, viewport: &Viewport) -> CropEvent {
        if !self.is_dragging() {
            return CropEvent::None;
        }
        self.pointer_move(screen, viewport);

        match self.rect {
            Some(rect) if rect.has_area() => {
                self.phase = CropPhase::Defined;
                tracing::trace!(?rect, "crop defined");
                CropEvent::Defined(rect)
            }
            _ => {
                self.reset();
                CropEvent::Discarded
            }
        }
    }

    /// Hand over the finalized rectangle and return to Idle.
    ///
    /// Returns `None` unless a rectangle is defined and no gesture is active.
    pub fn take_applied(&mut self) -> Option<Rect> {
        if self.phase != CropPhase::Defined {
            return None;
        }
        let rect = self.rect.take();
        self.phase = CropPhase::Idle;
        rect
    }

    /// Discard any rectangle.
    pub fn cancel(&mut self) -> CropEvent {
        let had_rect = self.rect.is_some();
        self.reset();
        if had_rect {
            CropEvent::Discarded
        } else {
            CropEvent::None
        }
    }

    fn clamp_point(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.bounds.0), p.y.clamp(0.0, self.bounds.1))
    }

    fn hit_handle(&self, p: Point, rect: &Rect, zoom: f64) -> Option<Handle> {
        let min = self.settings.handle_min_rect;
        if rect.width < min || rect.height < min {
            return None;
        }
        let radius = self.settings.handle_radius / zoom;
        Handle::ALL.into_iter().find(|handle| {
            let corner = handle.corner(rect);
            (p.x - corner.x).abs() <= radius && (p.y - corner.y).abs() <= radius
        })
    }

    fn drawn_rect(&self, anchor: Point, pointer: Point) -> Rect {
        let current = self.clamp_point(pointer);
        let mut rect = Rect::from_corners(anchor, current);
        if let Some(aspect) = self.ratio.aspect() {
            let (w, h) = constrain_to_aspect(rect.width, rect.height, aspect);
            // Keep the anchor corner where the user pressed
            rect = Rect::new(
                if current.x < anchor.x { anchor.x - w } else { anchor.x },
                if current.y < anchor.y { anchor.y - h } else { anchor.y },
                w,
                h,
            );
        }
        rect
    }

    fn resized_rect(&self, handle: Handle, start: Point, origin: Rect, pointer: Point) -> Rect {
        let (dx, dy) = start.delta_to(pointer);
        let fixed = handle.opposite().corner(&origin);
        let min = self.settings.min_size;

        let mut w = if handle.is_west() {
            origin.width - dx
        } else {
            origin.width + dx
        }
        .max(min);
        let mut h = if handle.is_north() {
            origin.height - dy
        } else {
            origin.height + dy
        }
        .max(min);

        if let Some(aspect) = self.ratio.aspect() {
            (w, h) = constrain_to_aspect(w, h, aspect);
            if w < min {
                (w, h) = (min, min / aspect);
            }
            if h < min {
                (w, h) = (min * aspect, min);
            }
        }

        // Room between the fixed corner and the frame edge
        let room_w = if handle.is_west() {
            fixed.x
        } else {
            self.bounds.0 - fixed.x
        };
        let room_h = if handle.is_north() {
            fixed.y
        } else {
            self.bounds.1 - fixed.y
        };
        if w > room_w || h > room_h {
            w = w.min(room_w);
            h = h.min(room_h);
            if let Some(aspect) = self.ratio.aspect() {
                (w, h) = constrain_to_aspect(w, h, aspect);
            }
        }

        Rect::new(
            if handle.is_west() { fixed.x - w } else { fixed.x },
            if handle.is_north() { fixed.y - h } else { fixed.y },
            w,
            h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn engine(width: u32, height: u32) -> CropEngine {
        CropEngine::new(width, height, CropSettings::default())
    }

    fn drag(engine: &mut CropEngine, vp: &Viewport, from: (f64, f64), to: (f64, f64)) -> CropEvent {
        engine.pointer_down(Point::new(from.0, from.1), vp);
        engine.pointer_move(Point::new(to.0, to.1), vp);
        engine.pointer_up(Point::new(to.0, to.1), vp)
    }

    fn assert_rect_close(a: Rect, b: Rect) {
        assert!(
            (a.x - b.x).abs() < EPS
                && (a.y - b.y).abs() < EPS
                && (a.width - b.width).abs() < EPS
                && (a.height - b.height).abs() < EPS,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_ratio_parse_and_display() {
        assert_eq!("free".parse::<CropRatio>().unwrap(), CropRatio::Free);
        assert_eq!(
            "16:9".parse::<CropRatio>().unwrap(),
            CropRatio::Ratio {
                width: 16,
                height: 9
            }
        );
        assert_eq!(CropRatio::Ratio { width: 4, height: 3 }.to_string(), "4:3");
        assert!("0:3".parse::<CropRatio>().is_err());
        assert!("wide".parse::<CropRatio>().is_err());
    }

    #[test]
    fn test_ratio_presets_roundtrip_through_strings() {
        for ratio in CropRatio::PRESETS {
            assert_eq!(ratio.to_string().parse::<CropRatio>().unwrap(), ratio);
        }
    }

    #[test]
    fn test_constrain_to_aspect() {
        assert_eq!(constrain_to_aspect(200.0, 100.0, 1.0), (100.0, 100.0));
        assert_eq!(constrain_to_aspect(100.0, 200.0, 1.0), (100.0, 100.0));
        let (w, h) = constrain_to_aspect(160.0, 160.0, 16.0 / 9.0);
        assert!((w - 160.0).abs() < EPS && (h - 90.0).abs() < EPS);
    }

    #[test]
    fn test_draw_defines_rect() {
        let vp = Viewport::default();
        let mut e = engine(200, 200);

        let event = drag(&mut e, &vp, (10.0, 20.0), (110.0, 70.0));

        assert_eq!(event, CropEvent::Defined(Rect::new(10.0, 20.0, 100.0, 50.0)));
        assert_eq!(e.phase(), CropPhase::Defined);
    }

    #[test]
    fn test_draw_backwards_normalizes() {
        let vp = Viewport::default();
        let mut e = engine(200, 200);
        drag(&mut e, &vp, (110.0, 70.0), (10.0, 20.0));
        assert_eq!(e.rect(), Some(Rect::new(10.0, 20.0, 100.0, 50.0)));
    }

    #[test]
    fn test_draw_clamps_to_bounds() {
        let vp = Viewport::default();
        let mut e = engine(100, 100);
        drag(&mut e, &vp, (50.0, 50.0), (500.0, -40.0));
        assert_eq!(e.rect(), Some(Rect::new(50.0, 0.0, 50.0, 50.0)));
    }

    #[test]
    fn test_click_without_drag_discards() {
        let vp = Viewport::default();
        let mut e = engine(100, 100);
        let event = drag(&mut e, &vp, (30.0, 30.0), (30.0, 30.0));
        assert_eq!(event, CropEvent::Discarded);
        assert_eq!(e.phase(), CropPhase::Idle);
        assert_eq!(e.rect(), None);
    }

    #[test]
    fn test_draw_respects_ratio() {
        let vp = Viewport::default();
        let mut e = engine(400, 400);
        e.set_ratio(CropRatio::Ratio { width: 1, height: 1 });
        drag(&mut e, &vp, (10.0, 10.0), (210.0, 110.0));
        assert_eq!(e.rect(), Some(Rect::new(10.0, 10.0, 100.0, 100.0)));
    }

    #[test]
    fn test_draw_ratio_keeps_anchor_when_dragging_up_left() {
        let vp = Viewport::default();
        let mut e = engine(400, 400);
        e.set_ratio(CropRatio::Ratio { width: 1, height: 1 });
        drag(&mut e, &vp, (300.0, 300.0), (100.0, 200.0));
        assert_eq!(e.rect(), Some(Rect::new(200.0, 200.0, 100.0, 100.0)));
    }

    #[test]
    fn test_pointer_mapped_through_viewport() {
        let mut vp = Viewport::default();
        vp.set_zoom(2.0);
        vp.set_pan(Point::new(20.0, 20.0));
        let mut e = engine(200, 200);
        drag(&mut e, &vp, (40.0, 60.0), (240.0, 160.0));
        assert_eq!(e.rect(), Some(Rect::new(10.0, 20.0, 100.0, 50.0)));
    }

    #[test]
    fn test_move_translates_and_clamps() {
        let vp = Viewport::default();
        let mut e = engine(200, 200);
        drag(&mut e, &vp, (50.0, 50.0), (100.0, 100.0));

        let event = drag(&mut e, &vp, (75.0, 75.0), (95.0, 65.0));
        assert_eq!(event, CropEvent::Defined(Rect::new(70.0, 40.0, 50.0, 50.0)));

        // Dragging far past the edge pins the rect against it
        drag(&mut e, &vp, (90.0, 60.0), (1000.0, 1000.0));
        assert_eq!(e.rect(), Some(Rect::new(150.0, 150.0, 50.0, 50.0)));
    }

    #[test]
    fn test_press_outside_starts_new_rect() {
        let vp = Viewport::default();
        let mut e = engine(200, 200);
        drag(&mut e, &vp, (10.0, 10.0), (60.0, 60.0));
        drag(&mut e, &vp, (120.0, 120.0), (180.0, 150.0));
        assert_eq!(e.rect(), Some(Rect::new(120.0, 120.0, 60.0, 30.0)));
    }

    #[test]
    fn test_resize_se_handle() {
        let vp = Viewport::default();
        let mut e = engine(300, 300);
        drag(&mut e, &vp, (50.0, 50.0), (150.0, 150.0));

        e.pointer_down(Point::new(150.0, 150.0), &vp);
        assert!(matches!(
            e.phase(),
            CropPhase::Resizing {
                handle: Handle::Se,
                ..
            }
        ));
        e.pointer_up(Point::new(180.0, 170.0), &vp);
        assert_eq!(e.rect(), Some(Rect::new(50.0, 50.0, 130.0, 120.0)));
    }

    #[test]
    fn test_resize_nw_keeps_opposite_corner() {
        let vp = Viewport::default();
        let mut e = engine(300, 300);
        drag(&mut e, &vp, (50.0, 50.0), (150.0, 150.0));

        drag(&mut e, &vp, (52.0, 48.0), (72.0, 38.0));

        let rect = e.rect().unwrap();
        assert_rect_close(rect, Rect::new(70.0, 40.0, 80.0, 110.0));
        assert!((rect.right() - 150.0).abs() < EPS);
        assert!((rect.bottom() - 150.0).abs() < EPS);
    }

    #[test]
    fn test_resize_floors_at_min_size() {
        let vp = Viewport::default();
        let mut e = engine(300, 300);
        drag(&mut e, &vp, (50.0, 50.0), (150.0, 150.0));

        // Drag the SE handle well past the NW corner
        drag(&mut e, &vp, (150.0, 150.0), (0.0, 0.0));
        assert_eq!(e.rect(), Some(Rect::new(50.0, 50.0, 10.0, 10.0)));
    }

    #[test]
    fn test_resize_clamps_to_bounds() {
        let vp = Viewport::default();
        let mut e = engine(200, 200);
        drag(&mut e, &vp, (50.0, 50.0), (150.0, 150.0));
        drag(&mut e, &vp, (150.0, 150.0), (400.0, 400.0));
        assert_eq!(e.rect(), Some(Rect::new(50.0, 50.0, 150.0, 150.0)));
    }

    #[test]
    fn test_resize_respects_ratio() {
        let vp = Viewport::default();
        let mut e = engine(400, 400);
        e.set_ratio(CropRatio::Ratio { width: 2, height: 1 });
        drag(&mut e, &vp, (0.0, 0.0), (200.0, 100.0));
        assert_eq!(e.rect(), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));

        drag(&mut e, &vp, (200.0, 100.0), (300.0, 300.0));
        let rect = e.rect().unwrap();
        assert_rect_close(rect, Rect::new(0.0, 0.0, 300.0, 150.0));
    }

    #[test]
    fn test_handles_scale_with_zoom() {
        let mut vp = Viewport::default();
        let mut e = engine(400, 400);
        drag(&mut e, &vp, (100.0, 100.0), (200.0, 200.0));

        // At zoom 4 the radius is 15/4 image px, so 10 px away misses
        vp.set_zoom(4.0);
        let screen = vp.image_to_screen(Point::new(190.0, 190.0));
        e.pointer_down(screen, &vp);
        assert!(matches!(e.phase(), CropPhase::Moving { .. }));
        e.pointer_up(screen, &vp);

        // At zoom 0.5 the radius is 30 image px
        vp.set_zoom(0.5);
        let screen = vp.image_to_screen(Point::new(175.0, 175.0));
        e.pointer_down(screen, &vp);
        assert!(matches!(
            e.phase(),
            CropPhase::Resizing {
                handle: Handle::Se,
                ..
            }
        ));
    }

    #[test]
    fn test_small_rect_has_no_handles() {
        let vp = Viewport::default();
        let mut e = engine(200, 200);
        drag(&mut e, &vp, (50.0, 50.0), (65.0, 65.0));
        e.pointer_down(Point::new(65.0, 65.0), &vp);
        assert!(matches!(e.phase(), CropPhase::Moving { .. }));
    }

    #[test]
    fn test_take_applied_returns_to_idle() {
        let vp = Viewport::default();
        let mut e = engine(200, 200);
        assert_eq!(e.take_applied(), None);

        drag(&mut e, &vp, (10.0, 10.0), (50.0, 50.0));
        assert_eq!(e.take_applied(), Some(Rect::new(10.0, 10.0, 40.0, 40.0)));
        assert_eq!(e.phase(), CropPhase::Idle);
        assert_eq!(e.take_applied(), None);
    }

    #[test]
    fn test_cancel() {
        let vp = Viewport::default();
        let mut e = engine(200, 200);
        assert_eq!(e.cancel(), CropEvent::None);
        drag(&mut e, &vp, (10.0, 10.0), (50.0, 50.0));
        assert_eq!(e.cancel(), CropEvent::Discarded);
        assert_eq!(e.phase(), CropPhase::Idle);
    }

    #[test]
    fn test_set_ratio_adjusts_defined_rect() {
        let vp = Viewport::default();
        let mut e = engine(400, 400);
        drag(&mut e, &vp, (10.0, 10.0), (210.0, 110.0));
        let adjusted = e.set_ratio(CropRatio::Ratio { width: 1, height: 1 });
        assert_eq!(adjusted, Some(Rect::new(10.0, 10.0, 100.0, 100.0)));
        assert_eq!(e.set_ratio(CropRatio::Free), None);
    }

    #[test]
    fn test_restore_and_bounds_change() {
        let mut e = engine(100, 100);
        e.restore(Some(Rect::new(10.0, 10.0, 30.0, 30.0)));
        assert_eq!(e.phase(), CropPhase::Defined);

        e.set_bounds(100, 100);
        assert_eq!(e.phase(), CropPhase::Defined);

        e.set_bounds(50, 100);
        assert_eq!(e.phase(), CropPhase::Idle);
        assert_eq!(e.rect(), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
