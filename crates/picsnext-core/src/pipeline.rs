//! Rendering an edit state onto a source buffer.
//!
//! ## Stage Order
//! 1. Rotation
//! 2. Color adjustment (brightness, contrast, saturation)
//! 3. Preset filter
//! 4. Blur
//!
//! Rendering always starts from the unmodified source, so each frame is a
//! pure function of `(source, state)`. Cropping is not a stage; an applied
//! crop produces a new source frame instead.

use crate::adjustments::apply_color_adjustment;
use crate::blur::apply_blur;
use crate::buffer::PixelBuffer;
use crate::filters::apply_preset;
use crate::transform::{apply_rotation, Rotation};
use crate::{EditState, FrameId};

/// Render `state` onto `source`.
///
/// # Example
/// ```
/// use picsnext_core::{render_frame, EditState, PixelBuffer, Rotation};
///
/// let source = PixelBuffer::filled(100, 50, [10, 20, 30, 255]);
/// let state = EditState { rotation: Rotation::Deg90, ..EditState::default() };
/// assert_eq!(render_frame(&source, &state).dimensions(), (50, 100));
/// ```
pub fn render_frame(source: &PixelBuffer, state: &EditState) -> PixelBuffer {
    let rotated = apply_rotation(source, state.rotation);
    render_adjustments(&rotated, state)
}

/// Run the stages after rotation on an already rotated buffer.
pub fn render_adjustments(rotated: &PixelBuffer, state: &EditState) -> PixelBuffer {
    let adjusted = apply_color_adjustment(rotated, state.brightness, state.contrast, state.saturation);
    let filtered = apply_preset(&adjusted, state.filter);
    apply_blur(&filtered, state.blur)
}

/// Caches the rotated copy of a frame so adjustment-only changes skip rotation.
#[derive(Debug, Default)]
pub struct RotationCache {
    entry: Option<CachedRotation>,
}

#[derive(Debug)]
struct CachedRotation {
    frame: FrameId,
    rotation: Rotation,
    buffer: PixelBuffer,
}

impl RotationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rotated copy of `source` (frame `frame`), computing it on a miss.
    pub fn rotated(&mut self, frame: FrameId, source: &PixelBuffer, rotation: Rotation) -> &PixelBuffer {
        let expected = rotation.rotated_dimensions(source.width, source.height);
        let cached = match self.entry.take() {
            Some(cached) if cached.frame == frame && cached.rotation == rotation => {
                if cached.buffer.dimensions() == expected {
                    Some(cached)
                } else {
                    tracing::warn!(
                        frame = frame.0,
                        expected = ?expected,
                        actual = ?cached.buffer.dimensions(),
                        "rotation cache dimension mismatch, recomputing"
                    );
                    debug_assert!(false, "rotation cache dimension mismatch");
                    None
                }
            }
            _ => None,
        };

        let cached = cached.unwrap_or_else(|| {
            tracing::debug!(frame = frame.0, rotation = rotation.degrees(), "rotation cache miss");
            CachedRotation {
                frame,
                rotation,
                buffer: apply_rotation(source, rotation),
            }
        });
        &self.entry.insert(cached).buffer
    }

    /// Drop the cached buffer.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self, frame: FrameId, rotation: Rotation) -> bool {
        matches!(&self.entry, Some(c) if c.frame == frame && c.rotation == rotation)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::test_support::gradient;
    use proptest::prelude::*;

    fn state() -> impl Strategy<Value = EditState> {
        (
            -100i32..=100,
            -100i32..=100,
            0u32..=200,
            0u32..=30,
            prop::sample::select(vec![Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270]),
            prop::sample::select(crate::PresetFilter::ALL.to_vec()),
        )
            .prop_map(|(brightness, contrast, saturation, blur, rotation, filter)| EditState {
                brightness,
                contrast,
                saturation,
                blur,
                rotation,
                filter,
                ..EditState::default()
            })
    }

    proptest! {
        /// Property: output size depends only on the rotation.
        #[test]
        fn prop_output_dimensions(w in 1u32..24, h in 1u32..24, state in state()) {
            let source = gradient(w, h);
            let out = render_frame(&source, &state);
            prop_assert_eq!(out.dimensions(), state.rotation.rotated_dimensions(w, h));
            prop_assert_eq!(out.pixels.len(), (w * h * 4) as usize);
        }
    }
}
