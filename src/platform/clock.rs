//! Fixed-rate scheduler
//!
//! Wall time goes into an accumulator; the game loop takes ticks out of it at
//! the session's current interval. The interval may change between ticks (it
//! shrinks when a wave is cleared), so ticks are taken one at a time.

use std::time::Duration;

use crate::consts::MAX_SUBSTEPS;

/// Longest stretch of wall time credited per poll (stalls, suspended terminal)
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct FrameClock {
    accumulator: Duration,
    substeps: u32,
    max_substeps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_substeps(MAX_SUBSTEPS)
    }

    pub fn with_max_substeps(max_substeps: u32) -> Self {
        Self {
            accumulator: Duration::ZERO,
            substeps: 0,
            max_substeps,
        }
    }

    /// Credit elapsed wall time and start a new poll
    pub fn accumulate(&mut self, elapsed: Duration) {
        self.accumulator += elapsed.min(MAX_FRAME_TIME);
        self.substeps = 0;
    }

    /// Take one tick if enough time has built up.
    ///
    /// A zero interval means "as fast as possible": every call succeeds until
    /// the per-poll substep cap is reached.
    pub fn take_tick(&mut self, interval: Duration) -> bool {
        if self.substeps >= self.max_substeps || self.accumulator < interval {
            return false;
        }
        self.accumulator -= interval;
        self.substeps += 1;
        true
    }

    /// Time left until the next tick is due
    pub fn until_next(&self, interval: Duration) -> Duration {
        interval.saturating_sub(self.accumulator)
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.substeps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(clock: &mut FrameClock, interval: Duration) -> u32 {
        let mut ticks = 0;
        while clock.take_tick(interval) {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_ticks_follow_elapsed_time() {
        let interval = Duration::from_millis(17);
        let mut clock = FrameClock::new();

        clock.accumulate(Duration::from_millis(10));
        assert_eq!(drain(&mut clock, interval), 0);
        assert_eq!(clock.until_next(interval), Duration::from_millis(7));

        clock.accumulate(Duration::from_millis(30));
        assert_eq!(drain(&mut clock, interval), 2);
        assert_eq!(clock.until_next(interval), Duration::from_millis(11));
    }

    #[test]
    fn test_substeps_are_capped() {
        let interval = Duration::from_millis(5);
        let mut clock = FrameClock::with_max_substeps(4);
        clock.accumulate(Duration::from_millis(50));
        assert_eq!(drain(&mut clock, interval), 4);

        // The backlog is still owed on later polls
        clock.accumulate(Duration::ZERO);
        assert_eq!(drain(&mut clock, interval), 4);
    }

    #[test]
    fn test_zero_interval_runs_at_cap() {
        let mut clock = FrameClock::with_max_substeps(3);
        clock.accumulate(Duration::ZERO);
        assert_eq!(drain(&mut clock, Duration::ZERO), 3);
        assert_eq!(clock.until_next(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let interval = Duration::from_millis(10);
        let mut clock = FrameClock::with_max_substeps(100);
        clock.accumulate(Duration::from_secs(5));
        assert_eq!(drain(&mut clock, interval), 10);
    }
}
