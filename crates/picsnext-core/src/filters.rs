//! Named stylistic color filters.
//!
//! Each preset is a pure per-pixel transform applied after the color
//! adjustments. Outputs are clamped to 0..=255 and rounded; alpha is unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::{to_channel, PixelBuffer};

/// Saturation multiplier used by the HDR preset.
const HDR_SATURATION_BOOST: f32 = 1.3;

/// A preset color filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetFilter {
    /// No filter (identity).
    #[default]
    None,
    Grayscale,
    Sepia,
    /// Sepia with lifted, flattened tones.
    Vintage,
    /// Blue boost, red cut.
    Cool,
    /// Red/yellow boost, blue cut.
    Warm,
    /// Saturation boost followed by a smoothstep S-curve.
    Hdr,
}

/// The name did not match any preset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown filter: {0}")]
pub struct ParseFilterError(pub String);

impl PresetFilter {
    /// All presets, in display order.
    pub const ALL: [PresetFilter; 7] = [
        PresetFilter::None,
        PresetFilter::Grayscale,
        PresetFilter::Sepia,
        PresetFilter::Vintage,
        PresetFilter::Cool,
        PresetFilter::Warm,
        PresetFilter::Hdr,
    ];

    /// Lowercase name of the preset.
    pub fn name(self) -> &'static str {
        match self {
            PresetFilter::None => "none",
            PresetFilter::Grayscale => "grayscale",
            PresetFilter::Sepia => "sepia",
            PresetFilter::Vintage => "vintage",
            PresetFilter::Cool => "cool",
            PresetFilter::Warm => "warm",
            PresetFilter::Hdr => "hdr",
        }
    }

    /// Transform a single RGB triple. Values are returned unclamped.
    #[inline]
    fn transform(self, r: f32, g: f32, b: f32) -> (f32, f32, f32) {
        match self {
            PresetFilter::None => (r, g, b),
            PresetFilter::Grayscale => {
                let gray = luma(r, g, b);
                (gray, gray, gray)
            }
            PresetFilter::Sepia => sepia(r, g, b),
            PresetFilter::Vintage => {
                let (r, g, b) = sepia(r, g, b);
                (
                    (r * 0.9 + 20.0).min(255.0),
                    (g * 0.9 + 20.0).min(255.0),
                    (b * 0.9 + 10.0).min(255.0),
                )
            }
            PresetFilter::Cool => (r * 0.8, g * 0.95, (b * 1.2).min(255.0)),
            PresetFilter::Warm => ((r * 1.15).min(255.0), (g * 1.05).min(255.0), b * 0.85),
            PresetFilter::Hdr => {
                let lum = luma(r, g, b);
                let boost = |v: f32| lum + (v - lum) * HDR_SATURATION_BOOST;
                (
                    s_curve(boost(r)),
                    s_curve(boost(g)),
                    s_curve(boost(b)),
                )
            }
        }
    }
}

impl fmt::Display for PresetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PresetFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        PresetFilter::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .ok_or_else(|| ParseFilterError(s.to_string()))
    }
}

/// Apply a preset filter, producing a new buffer.
///
/// `PresetFilter::None` returns an unchanged copy.
pub fn apply_preset(buffer: &PixelBuffer, filter: PresetFilter) -> PixelBuffer {
    if filter == PresetFilter::None {
        return buffer.clone();
    }

    buffer.map_pixels(|[r, g, b, a]| {
        let (r, g, b) = filter.transform(r as f32, g as f32, b as f32);
        [to_channel(r), to_channel(g), to_channel(b), a]
    })
}

/// Luma with ITU-R BT.601 weights.
#[inline]
fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

#[inline]
fn sepia(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    (
        (0.393 * r + 0.769 * g + 0.189 * b).min(255.0),
        (0.349 * r + 0.686 * g + 0.168 * b).min(255.0),
        (0.272 * r + 0.534 * g + 0.131 * b).min(255.0),
    )
}

/// Smoothstep contrast curve `3x² - 2x³` on a 0..=255 channel.
///
/// The normalized input is clamped to [0, 1] first; outside that range the
/// cubic turns back on itself.
#[inline]
fn s_curve(value: f32) -> f32 {
    let x = (value / 255.0).clamp(0.0, 1.0);
    (3.0 * x * x - 2.0 * x * x * x) * 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_px(px: [u8; 4], filter: PresetFilter) -> [u8; 4] {
        let buf = PixelBuffer::new(1, 1, px.to_vec());
        let out = apply_preset(&buf, filter).pixels;
        [out[0], out[1], out[2], out[3]]
    }

    #[test]
    fn test_none_is_identity() {
        let px = [12, 200, 99, 40];
        assert_eq!(apply_px(px, PresetFilter::None), px);
    }

    #[test]
    fn test_grayscale() {
        // 0.299*200 + 0.587*100 + 0.114*50 = 124.2
        assert_eq!(
            apply_px([200, 100, 50, 255], PresetFilter::Grayscale),
            [124, 124, 124, 255]
        );
    }

    #[test]
    fn test_sepia() {
        // R = 0.393*100 + 0.769*100 + 0.189*100 = 135.1
        // G = 0.349*100 + 0.686*100 + 0.168*100 = 120.3
        // B = 0.272*100 + 0.534*100 + 0.131*100 = 93.7
        assert_eq!(
            apply_px([100, 100, 100, 255], PresetFilter::Sepia),
            [135, 120, 94, 255]
        );
    }

    #[test]
    fn test_sepia_caps_at_white() {
        assert_eq!(
            apply_px([255, 255, 255, 255], PresetFilter::Sepia),
            [255, 255, 239, 255]
        );
    }

    #[test]
    fn test_vintage() {
        // Sepia of 100 gray then *0.9 + 20/20/10
        // R = 135.1*0.9 + 20 = 141.59, G = 120.3*0.9 + 20 = 128.27, B = 93.7*0.9 + 10 = 94.33
        assert_eq!(
            apply_px([100, 100, 100, 255], PresetFilter::Vintage),
            [142, 128, 94, 255]
        );
    }

    #[test]
    fn test_cool() {
        assert_eq!(
            apply_px([100, 100, 100, 255], PresetFilter::Cool),
            [80, 95, 120, 255]
        );
        assert_eq!(apply_px([0, 0, 250, 255], PresetFilter::Cool)[2], 255);
    }

    #[test]
    fn test_warm() {
        assert_eq!(
            apply_px([100, 100, 100, 255], PresetFilter::Warm),
            [115, 105, 85, 255]
        );
    }

    #[test]
    fn test_hdr_gray_follows_s_curve() {
        // Gray pixels have no chroma to boost, so only the curve applies.
        // x = 64/255 = 0.251, 3x² - 2x³ = 0.1574 -> 40.1
        let out = apply_px([64, 64, 64, 255], PresetFilter::Hdr);
        assert_eq!(out, [40, 40, 40, 255]);
        // Midpoint-ish stays near the middle
        let mid = apply_px([128, 128, 128, 255], PresetFilter::Hdr);
        assert!((mid[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_hdr_extremes_are_fixed_points() {
        assert_eq!(apply_px([0, 0, 0, 255], PresetFilter::Hdr), [0, 0, 0, 255]);
        assert_eq!(
            apply_px([255, 255, 255, 255], PresetFilter::Hdr),
            [255, 255, 255, 255]
        );
    }

    #[test]
    fn test_hdr_oversaturated_channel_stays_bright() {
        // Boosting pushes red past 255; the clamped curve keeps it at 255.
        let out = apply_px([250, 50, 50, 255], PresetFilter::Hdr);
        assert_eq!(out[0], 255);
    }

    #[test]
    fn test_alpha_unchanged_for_all_presets() {
        for filter in PresetFilter::ALL {
            assert_eq!(apply_px([10, 20, 30, 99], filter)[3], 99, "{filter}");
        }
    }

    #[test]
    fn test_parse_and_display() {
        for filter in PresetFilter::ALL {
            assert_eq!(filter.to_string().parse::<PresetFilter>(), Ok(filter));
        }
        assert_eq!("HDR".parse::<PresetFilter>(), Ok(PresetFilter::Hdr));
        assert_eq!(
            "polaroid".parse::<PresetFilter>(),
            Err(ParseFilterError("polaroid".to_string()))
        );
    }
}
