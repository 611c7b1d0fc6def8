//! Points and rectangles in image or screen space.

use serde::{Deserialize, Serialize};

/// A 2-D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from `self` to `other` along each axis.
    pub fn delta_to(self, other: Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}

/// An axis-aligned rectangle in image pixel space.
///
/// A finalized crop rectangle always satisfies `x >= 0`, `y >= 0`,
/// `x + width <= bounds.width`, `y + height <= bounds.height` and a positive
/// size. During a drag the size may transiently be zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Rectangle covering a whole `width × height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment test (edges count as inside).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// True when both dimensions are strictly positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Intersect with `[0, width] × [0, height]`.
    ///
    /// The result may have zero size if the rectangle lies outside the bounds.
    pub fn clamp_to(&self, width: f64, height: f64) -> Rect {
        let left = self.x.clamp(0.0, width);
        let top = self.y.clamp(0.0, height);
        let right = self.right().clamp(0.0, width);
        let bottom = self.bottom().clamp(0.0, height);
        Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
    }

    /// Move the rectangle so it lies fully inside `[0, width] × [0, height]`,
    /// keeping its size where possible.
    pub fn translate_within(&self, width: f64, height: f64) -> Rect {
        let w = self.width.min(width);
        let h = self.height.min(height);
        Rect::new(
            self.x.clamp(0.0, width - w),
            self.y.clamp(0.0, height - h),
            w,
            h,
        )
    }
}
