//! Simulation clock — logical tick source
//!
//! One tick is one simulated millisecond. The wall-clock interval between
//! ticks only matters to whoever drives the simulation and to display code.

/// Default wall-clock spacing between ticks
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 100;

/// Logical simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    /// Current tick
    now: u64,
    /// Wall-clock spacing between ticks (display-only)
    tick_interval_ms: u32,
}

impl SimulationClock {
    /// Clock at t = 0
    pub const fn new(tick_interval_ms: u32) -> Self {
        Self {
            now: 0,
            tick_interval_ms,
        }
    }

    /// Advance by one tick
    pub fn advance(&mut self) {
        self.now += 1;
    }

    /// Current tick
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Wall-clock spacing between ticks
    pub fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms
    }

    /// How long the run has taken on screen so far
    pub fn wall_elapsed_ms(&self) -> u64 {
        self.now * u64::from(self.tick_interval_ms)
    }

    /// Back to t = 0
    pub fn reset(&mut self) {
        self.now = 0;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL_MS)
    }
}

/// End of the period containing `now`: `floor(now / period + 1) * period`
///
/// A zero period has no deadline.
pub fn next_deadline(now: u64, period: u32) -> u64 {
    if period == 0 {
        return u64::MAX;
    }
    let period = u64::from(period);
    (now / period + 1) * period
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advance() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.now(), 0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.now(), 2);
        assert_eq!(clock.wall_elapsed_ms(), 200);
    }

    #[test]
    fn test_clock_reset() {
        let mut clock = SimulationClock::new(10);
        for _ in 0..5 {
            clock.advance();
        }
        clock.reset();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.tick_interval_ms(), 10);
    }

    #[test]
    fn test_next_deadline() {
        assert_eq!(next_deadline(0, 50), 50);
        assert_eq!(next_deadline(49, 50), 50);
        assert_eq!(next_deadline(50, 50), 100);
        assert_eq!(next_deadline(120, 200), 200);
    }

    #[test]
    fn test_zero_period_has_no_deadline() {
        assert_eq!(next_deadline(10, 0), u64::MAX);
    }
}
