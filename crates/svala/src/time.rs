//! Frame timing.
//!
//! [`FrameClock`] converts monotonic host time into the delta and elapsed
//! values the animation behaviors consume. The driver ticks it once at the
//! start of every frame. The clock can be paused (elapsed time freezes, delta
//! reads as zero) and reset back to zero.

use std::time::{Duration, Instant};

/// Per-frame timing state, updated by the driver at the start of each frame.
///
/// Invariants: elapsed time is non-decreasing while running and frozen while
/// paused.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    /// When the current frame started (wall clock).
    frame_start: Instant,
    /// Duration of the previous frame (zero while paused).
    delta: Duration,
    /// Accumulated unpaused time since start (or the last reset).
    elapsed: Duration,
    /// Frames counted while running.
    frame_count: u64,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_start: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            paused: false,
        }
    }

    /// Advance from the host clock. Called by the driver once per frame.
    pub(crate) fn tick(&mut self) {
        let now = Instant::now();
        let raw = now - self.frame_start;
        self.frame_start = now;
        self.advance(raw);
    }

    /// Advance by an externally measured delta. Headless callers can drive
    /// the clock directly instead of going through `tick`.
    pub fn advance(&mut self, dt: Duration) {
        if self.paused {
            self.delta = Duration::ZERO;
            return;
        }
        self.delta = dt;
        self.elapsed += dt;
        self.frame_count += 1;
    }

    /// Freeze or unfreeze elapsed time. While paused, `delta` reads as zero
    /// and `elapsed` holds its value.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        // The next tick measures from here, so time spent paused never leaks
        // into the first running delta.
        self.frame_start = Instant::now();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Rewind elapsed time to zero. The paused flag is left as-is.
    pub fn reset(&mut self) {
        self.frame_start = Instant::now();
        self.delta = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.frame_count = 0;
    }

    /// Duration of the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds (f32), the most common way to use it.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Unpaused time since start.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Unpaused time since start, in seconds (f32).
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of frames advanced so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS based on the last frame's delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(16);

    #[test]
    fn elapsed_accumulates() {
        let mut clock = FrameClock::new();
        clock.advance(STEP);
        clock.advance(STEP);
        assert_eq!(clock.elapsed(), STEP * 2);
        assert_eq!(clock.frame_count(), 2);
        assert_eq!(clock.delta(), STEP);
    }

    #[test]
    fn elapsed_is_non_decreasing() {
        let mut clock = FrameClock::new();
        let mut last = clock.elapsed();
        for _ in 0..100 {
            clock.advance(Duration::from_micros(500));
            assert!(clock.elapsed() >= last);
            last = clock.elapsed();
        }
    }

    #[test]
    fn pause_freezes_elapsed() {
        let mut clock = FrameClock::new();
        clock.advance(STEP);
        let frozen = clock.elapsed();

        clock.set_paused(true);
        clock.advance(STEP);
        clock.advance(STEP);
        assert_eq!(clock.elapsed(), frozen);
        assert_eq!(clock.delta(), Duration::ZERO);

        clock.set_paused(false);
        clock.advance(STEP);
        assert_eq!(clock.elapsed(), frozen + STEP);
    }

    #[test]
    fn reset_rewinds_to_zero() {
        let mut clock = FrameClock::new();
        clock.advance(STEP);
        clock.advance(STEP);
        clock.reset();
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.frame_count(), 0);
    }

    #[test]
    fn fps_from_delta() {
        let mut clock = FrameClock::new();
        clock.advance(Duration::from_millis(20));
        assert!((clock.fps() - 50.0).abs() < 0.01);
    }
}
