//! Rolling frame-rate and interaction-latency measurements.
//!
//! The host supplies millisecond timestamps (e.g. `performance.now()` in a
//! browser), so nothing here reads a clock.

use std::collections::VecDeque;

/// Frame timestamps kept for the FPS estimate (about one second at 60 FPS).
pub const FRAME_WINDOW: usize = 60;

/// Latency samples kept for the rolling average.
pub const LATENCY_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq)]
struct PendingInteraction {
    started_ms: f64,
    kind: String,
}

/// FPS and interaction latency over a sliding window.
#[derive(Debug, Clone, Default)]
pub struct PerformanceMetrics {
    frames: VecDeque<f64>,
    latencies: VecDeque<f64>,
    pending: Option<PendingInteraction>,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that a frame was presented at `timestamp_ms`.
    pub fn record_frame(&mut self, timestamp_ms: f64) {
        self.frames.push_back(timestamp_ms);
        while self.frames.len() > FRAME_WINDOW {
            self.frames.pop_front();
        }
    }

    /// Frames per second over the window, rounded. Zero until two frames are seen.
    pub fn fps(&self) -> u32 {
        let (Some(first), Some(last)) = (self.frames.front(), self.frames.back()) else {
            return 0;
        };
        let span = last - first;
        if self.frames.len() < 2 || span <= 0.0 {
            return 0;
        }
        ((self.frames.len() - 1) as f64 / span * 1000.0).round() as u32
    }

    /// Start timing an interaction such as `"filter"` or `"rotate"`.
    ///
    /// A second call before [`end_interaction`](Self::end_interaction)
    /// restarts the measurement.
    pub fn begin_interaction(&mut self, timestamp_ms: f64, kind: impl Into<String>) {
        self.pending = Some(PendingInteraction {
            started_ms: timestamp_ms,
            kind: kind.into(),
        });
    }

    /// Finish the pending interaction once its effect is visible.
    ///
    /// Returns the measured latency, or `None` if nothing was pending.
    pub fn end_interaction(&mut self, timestamp_ms: f64) -> Option<f64> {
        let pending = self.pending.take()?;
        let latency = (timestamp_ms - pending.started_ms).max(0.0);
        self.latencies.push_back(latency);
        while self.latencies.len() > LATENCY_WINDOW {
            self.latencies.pop_front();
        }
        tracing::trace!(kind = %pending.kind, latency_ms = latency, "interaction finished");
        Some(latency)
    }

    /// Mean of the recent latencies in milliseconds, 0 with no samples.
    pub fn average_latency(&self) -> f64 {
        if self.latencies.is_empty() {
            return 0.0;
        }
        self.latencies.iter().sum::<f64>() / self.latencies.len() as f64
    }

    /// Most recent latency in milliseconds, 0 with no samples.
    pub fn current_latency(&self) -> f64 {
        self.latencies.back().copied().unwrap_or(0.0)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
