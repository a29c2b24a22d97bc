use std::time::{Duration, Instant};

/// Upper bound on one simulation step, about two frames at 60 Hz.
pub const DEFAULT_MAX_FRAME_TIME: Duration = Duration::from_millis(33);

/// Wall-clock frame timer with a clamped step.
///
/// A debugger pause or a long hitch never turns into one huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    max_step: Duration,
}

impl FrameClock {
    pub fn new(start: Instant, max_step: Duration) -> Self {
        Self {
            last: start,
            max_step,
        }
    }

    /// Elapsed time since the previous tick, clamped to `max_step`.
    ///
    /// An instant earlier than the previous tick yields zero.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = self.last.max(now);
        if elapsed > self.max_step {
            tracing::trace!(?elapsed, max = ?self.max_step, "clamping frame step");
        }
        elapsed.min(self.max_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_gap_is_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start, DEFAULT_MAX_FRAME_TIME);
        let dt = clock.tick(start + Duration::from_millis(500));
        assert_eq!(dt, Duration::from_millis(33));
    }

    #[test]
    fn short_gap_passes_through() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start, DEFAULT_MAX_FRAME_TIME);
        assert_eq!(
            clock.tick(start + Duration::from_millis(16)),
            Duration::from_millis(16)
        );
        assert_eq!(
            clock.tick(start + Duration::from_millis(20)),
            Duration::from_millis(4)
        );
    }

    #[test]
    fn time_going_backwards_yields_zero() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start + Duration::from_millis(10), DEFAULT_MAX_FRAME_TIME);
        assert_eq!(clock.tick(start), Duration::ZERO);
        assert_eq!(
            clock.tick(start + Duration::from_millis(15)),
            Duration::from_millis(5)
        );
    }
}
