//! Frame scheduling.
//!
//! The engine advances on a fixed logical timestep: every scheduled frame
//! is one tick of [`LOGICAL_DT_MS`] milliseconds, independent of actual
//! elapsed wall-clock time. This keeps particle speed reproducible across
//! machines and refresh rates; hosts that want faster motion call
//! [`AnimationScheduler::frame`] more often, not with a larger step.

use crate::engine::Engine;
use crate::render::Surface;

/// Logical milliseconds per tick.
pub const LOGICAL_DT_MS: f32 = 16.0;

/// Logical seconds per tick, for per-second rates.
pub const LOGICAL_DT_SECS: f32 = LOGICAL_DT_MS / 1000.0;

/// Fixed-step frame counter.
#[derive(Debug, Default)]
pub struct FrameClock {
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame and return the logical timestep in ticks.
    pub fn advance(&mut self) -> f32 {
        self.frame_count += 1;
        1.0
    }

    /// Total frames scheduled.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Logical elapsed seconds, derived from the frame count.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.frame_count as f32 * LOGICAL_DT_SECS
    }
}

/// Drives the tick → rebuild → draw cycle once per frame.
///
/// The host owns the actual frame callback (requestAnimationFrame, vsync,
/// a test loop); each callback invokes [`AnimationScheduler::frame`] and
/// reschedules only while it returns `true`.
#[derive(Default)]
pub struct AnimationScheduler {
    clock: FrameClock,
    stopped: bool,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame.
    ///
    /// Returns `true` when the host should schedule another frame. With
    /// reduced motion active the current state is rendered unchanged and
    /// `false` is returned - repeated calls render the identical frame.
    /// After [`AnimationScheduler::stop`] this is a no-op: no tick, no
    /// surface writes.
    pub fn frame<S: Surface + ?Sized>(&mut self, engine: &mut Engine, surface: &mut S) -> bool {
        if self.stopped {
            return false;
        }
        if engine.is_motion_reduced() {
            engine.draw(surface);
            return false;
        }
        let dt = self.clock.advance();
        engine.tick_by(dt);
        engine.draw(surface);
        true
    }

    /// Stop the loop deterministically.
    ///
    /// Guarantees no further ticks or surface writes once this returns,
    /// and clears any fractional spawns the emitter still owed.
    pub fn stop(&mut self, engine: &mut Engine) {
        if !self.stopped {
            log::debug!("scheduler stopped after {} frames", self.clock.frame());
            self.stopped = true;
            engine.clear_pending();
        }
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.clock.frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_counts_fixed_steps() {
        let mut clock = FrameClock::new();
        for _ in 0..10 {
            assert_eq!(clock.advance(), 1.0);
        }
        assert_eq!(clock.frame(), 10);
        assert!((clock.elapsed() - 0.16).abs() < 1e-6);
    }
}
