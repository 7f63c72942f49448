//! Dissolve mask drawn over the stage while a transition is in flight.

use std::time::{Duration, Instant};

/// `(progress, opacity)` keyframes of one dissolve.
const KEYFRAMES: [(f32, f32); 4] = [(0.0, 0.0), (0.4, 1.0), (0.6, 1.0), (1.0, 0.0)];

/// Cubic ease-in-out over `t` in `[0, 1]`.
fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Full-screen overlay that rises to opaque, holds while the scene beneath
/// is swapped, then clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DissolveMask {
    duration: Duration,
    shown_at: Option<Instant>,
}

impl DissolveMask {
    /// A hidden mask whose dissolve lasts `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            shown_at: None,
        }
    }

    /// Length of one dissolve.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns `true` while a dissolve is running.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.shown_at.is_some()
    }

    /// Starts a dissolve at `now`.
    pub fn show(&mut self, now: Instant) {
        self.shown_at = Some(now);
    }

    /// Removes the mask.
    pub fn hide(&mut self) {
        self.shown_at = None;
    }

    /// Opacity at `now`, `0.0` when hidden.
    #[must_use]
    pub fn opacity(&self, now: Instant) -> f32 {
        let Some(shown_at) = self.shown_at else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let progress =
            now.saturating_duration_since(shown_at).as_secs_f32() / self.duration.as_secs_f32();
        let progress = progress.clamp(0.0, 1.0);
        for pair in KEYFRAMES.windows(2) {
            let (start, from) = pair[0];
            let (end, to) = pair[1];
            if progress <= end {
                let t = (progress - start) / (end - start);
                return from + (to - from) * ease_in_out_cubic(t);
            }
        }
        0.0
    }
}
