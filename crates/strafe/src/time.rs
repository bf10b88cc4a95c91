//! Frame timing and delta time.
//!
//! [`Time`] lives on the [`Context`](crate::context::Context) and is advanced
//! once at the top of each frame, before any system runs. Systems read
//! `delta_secs()` for integration and `elapsed_secs()` as the game clock
//! (shot timestamps, fire-rate gating).
//!
//! [`Time::advance`] takes the step explicitly: the window measures the wall
//! clock between redraws, tests pass a fixed delta.

use std::time::Duration;

/// Longest frame delta fed to the systems.
pub const MAX_DELTA: Duration = Duration::from_millis(250);

/// Frame timing state.
#[derive(Clone, Copy)]
pub struct Time {
    /// Delta of the current frame.
    delta: Duration,
    /// Game time: sum of all deltas.
    elapsed: Duration,
    /// Frame counter.
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance by one frame of `delta`, clamped to [`MAX_DELTA`].
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta.min(MAX_DELTA);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    /// Duration of the current frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds (f32), the most common way to use it.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total game time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total game time in seconds (f32).
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of frames advanced so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
