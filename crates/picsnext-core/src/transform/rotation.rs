//! Lossless cardinal rotation.
//!
//! Only quarter turns are supported, so every output pixel is an exact copy
//! of one input pixel and no interpolation is involved. Rotation is
//! clockwise, matching on-screen canvas rotation.
//!
//! For a source of size `w × h`, a source pixel `(x, y)` lands at:
//! ```text
//!  90°: (h - 1 - y, x)        output size h × w
//! 180°: (w - 1 - x, h - 1 - y) output size w × h
//! 270°: (y, w - 1 - x)        output size h × w
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::{PixelBuffer, CHANNELS};

/// The angle is not a multiple of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Rotation must be a multiple of 90 degrees, got {0}")]
pub struct InvalidRotation(pub i32);

/// A clockwise quarter-turn rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Build from degrees. Any multiple of 90 is accepted and normalized,
    /// so `-90` and `450` are both valid.
    pub fn from_degrees(degrees: i32) -> Result<Self, InvalidRotation> {
        if degrees % 90 != 0 {
            return Err(InvalidRotation(degrees));
        }
        Ok(Self::from_quarter_turns(degrees / 90))
    }

    fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    fn quarter_turns(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    /// Angle in degrees (0, 90, 180 or 270).
    pub fn degrees(self) -> i32 {
        self.quarter_turns() * 90
    }

    /// One more quarter turn clockwise.
    pub fn clockwise(self) -> Self {
        self.compose(Rotation::Deg90)
    }

    /// One quarter turn counter-clockwise.
    pub fn counter_clockwise(self) -> Self {
        self.compose(Rotation::Deg270)
    }

    /// Rotation equivalent to applying `self` then `other`.
    pub fn compose(self, other: Rotation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// Rotation that takes `base` to `self`.
    pub fn delta_from(self, base: Rotation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() - base.quarter_turns())
    }

    /// True for 90 and 270 degrees.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Output dimensions for an input of `width × height`.
    pub fn rotated_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Rotate an image clockwise by a quarter-turn multiple.
///
/// # Example
///
/// ```
/// use picsnext_core::{transform::{apply_rotation, Rotation}, PixelBuffer};
///
/// let img = PixelBuffer::filled(100, 50, [0, 0, 0, 255]);
/// let rotated = apply_rotation(&img, Rotation::Deg90);
/// assert_eq!(rotated.dimensions(), (50, 100));
/// ```
pub fn apply_rotation(image: &PixelBuffer, rotation: Rotation) -> PixelBuffer {
    if rotation == Rotation::Deg0 {
        return image.clone();
    }

    let (w, h) = (image.width as usize, image.height as usize);
    let (dst_w, dst_h) = rotation.rotated_dimensions(image.width, image.height);
    let mut output = vec![0u8; image.pixels.len()];

    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = match rotation {
                Rotation::Deg0 => (x, y),
                Rotation::Deg90 => (h - 1 - y, x),
                Rotation::Deg180 => (w - 1 - x, h - 1 - y),
                Rotation::Deg270 => (y, w - 1 - x),
            };
            let src_idx = (y * w + x) * CHANNELS;
            let dst_idx = (dy * dst_w as usize + dx) * CHANNELS;
            output[dst_idx..dst_idx + CHANNELS]
                .copy_from_slice(&image.pixels[src_idx..src_idx + CHANNELS]);
        }
    }

    PixelBuffer::new(dst_w, dst_h, output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
