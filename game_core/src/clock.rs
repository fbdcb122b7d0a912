//! Animation-frame driven tick source.
//!
//! One tick per rendered frame. The measured frame interval is only kept
//! for diagnostics; motion never scales with it.

use crate::Time;

/// Frames slower than this are logged as stalls
const STALL_MS: f64 = 250.0;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_frame_ms: Option<f64>,
    frames: u64,
    last_interval_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept an animation-frame timestamp. Returns the tick time, or `None`
    /// for a repeated, backwards or non-finite timestamp.
    pub fn on_frame(&mut self, now_ms: f64) -> Option<Time> {
        if !now_ms.is_finite() || now_ms < 0.0 {
            return None;
        }
        if let Some(last) = self.last_frame_ms {
            if now_ms <= last {
                return None;
            }
            self.last_interval_ms = now_ms - last;
            if self.last_interval_ms > STALL_MS {
                tracing::debug!(interval_ms = self.last_interval_ms, "frame stall");
            }
        }

        self.last_frame_ms = Some(now_ms);
        self.frames += 1;
        // Timestamps are checked finite and non-negative above
        Some(Time::new(now_ms as u64))
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Interval between the last two accepted frames
    pub fn last_interval_ms(&self) -> f64 {
        self.last_interval_ms
    }
}
