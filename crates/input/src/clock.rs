/// Frame timing: remembers the previous timestamp and the last elapsed delta.
///
/// Timestamps are seconds on any monotonic timeline chosen by the caller
/// (window-system time, `Instant` offsets, or a recorded trace).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameClock {
    last: f64,
    delta: f64,
}

impl FrameClock {
    /// Start the clock at `start` seconds with a zero delta.
    pub fn new(start: f64) -> Self {
        Self {
            last: start,
            delta: 0.0,
        }
    }

    /// Advance to `now` and return the elapsed seconds since the previous tick.
    /// A timestamp earlier than the previous one yields a zero delta.
    pub fn tick(&mut self, now: f64) -> f32 {
        self.delta = (now - self.last).max(0.0);
        self.last = now;
        self.delta as f32
    }

    /// Delta computed by the most recent tick.
    pub fn delta(&self) -> f32 {
        self.delta as f32
    }

    /// Timestamp of the most recent tick.
    pub fn last(&self) -> f64 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_measures_from_start() {
        let mut clock = FrameClock::new(1.0);
        assert_eq!(clock.delta(), 0.0);
        let dt = clock.tick(1.25);
        assert!((dt - 0.25).abs() < 1e-6);
        assert_eq!(clock.last(), 1.25);
    }

    #[test]
    fn successive_ticks() {
        let mut clock = FrameClock::new(0.0);
        clock.tick(0.5);
        let dt = clock.tick(0.75);
        assert!((dt - 0.25).abs() < 1e-6);
        assert!((clock.delta() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn backwards_time_is_zero_delta() {
        let mut clock = FrameClock::new(2.0);
        assert_eq!(clock.tick(1.0), 0.0);
        assert_eq!(clock.last(), 1.0);
    }
}
