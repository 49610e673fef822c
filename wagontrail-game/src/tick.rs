//! Fixed-interval pulse generation.
//!
//! The driver calls [`TickSource::advance`] as often as it likes (every frame
//! for animation). Each call is a system tick; once enough wall-clock time has
//! accumulated the call is promoted to a simulation tick, which is the only
//! kind of tick that advances turns.
use std::time::Duration;

/// One pulse delivered to the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    /// True for animation-only ticks, false for simulation ticks.
    pub system: bool,
    /// Simulation ticks that consume a day without moving the wagon.
    pub forced_skip: bool,
}

impl Pulse {
    pub const SYSTEM: Self = Self {
        system: true,
        forced_skip: false,
    };

    pub const SIMULATION: Self = Self {
        system: false,
        forced_skip: false,
    };

    pub const FORCED_SKIP: Self = Self {
        system: false,
        forced_skip: true,
    };

    #[must_use]
    pub const fn is_simulation(self) -> bool {
        !self.system
    }
}

#[derive(Debug, Clone)]
pub struct TickSource {
    interval: Duration,
    accumulated: Duration,
    total_ticks: u64,
    total_simulation_ticks: u64,
}

impl TickSource {
    /// A zero interval is bumped to one millisecond.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
            total_ticks: 0,
            total_simulation_ticks: 0,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Account for `elapsed` wall-clock time and classify the resulting pulse.
    ///
    /// At most one simulation tick is emitted per call; leftover time carries
    /// over so a slow frame is caught up on the following calls.
    pub fn advance(&mut self, elapsed: Duration) -> Pulse {
        self.total_ticks += 1;
        self.accumulated += elapsed;
        if self.accumulated < self.interval {
            return Pulse::SYSTEM;
        }
        self.accumulated -= self.interval;
        self.total_simulation_ticks += 1;
        Pulse::SIMULATION
    }

    #[must_use]
    pub const fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    #[must_use]
    pub const fn total_simulation_ticks(&self) -> u64 {
        self.total_simulation_ticks
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.total_ticks = 0;
        self.total_simulation_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotes_one_in_ten_frames() {
        let mut ticks = TickSource::new(Duration::from_secs(1));
        let pulses: Vec<Pulse> = (0..20)
            .map(|_| ticks.advance(Duration::from_millis(100)))
            .collect();
        let simulated = pulses.iter().filter(|p| p.is_simulation()).count();
        assert_eq!(simulated, 2);
        assert_eq!(pulses[9], Pulse::SIMULATION);
        assert_eq!(ticks.total_ticks(), 20);
        assert_eq!(ticks.total_simulation_ticks(), 2);
    }

    #[test]
    fn slow_frames_carry_over() {
        let mut ticks = TickSource::new(Duration::from_millis(500));
        assert!(ticks.advance(Duration::from_millis(1_200)).is_simulation());
        assert!(ticks.advance(Duration::ZERO).is_simulation());
        assert!(!ticks.advance(Duration::ZERO).is_simulation());
        assert!(ticks.advance(Duration::from_millis(300)).is_simulation());
    }

    #[test]
    fn reset_zeroes_counters() {
        let mut ticks = TickSource::new(Duration::ZERO);
        assert_eq!(ticks.interval(), Duration::from_millis(1));
        ticks.advance(Duration::from_millis(5));
        ticks.reset();
        assert_eq!(ticks.total_ticks(), 0);
        assert_eq!(ticks.total_simulation_ticks(), 0);
    }
}
