//! Tick clock for the logistics simulation.
//!
//! The tick number is the only temporal state the network needs. It is
//! advanced once at the start of every tick with checked arithmetic.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Monotonic tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickClock {
    /// Current tick (0 before the first tick has run).
    tick: u64,
}

impl TickClock {
    /// Create a clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// Create a clock resuming from `tick`.
    pub const fn starting_at(tick: u64) -> Self {
        Self { tick }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_increments() {
        let mut clock = TickClock::new();
        assert_eq!(clock.advance().ok(), Some(1));
        assert_eq!(clock.advance().ok(), Some(2));
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn advance_overflow_is_an_error() {
        let mut clock = TickClock::starting_at(u64::MAX);
        assert!(clock.advance().is_err());
        assert_eq!(clock.tick(), u64::MAX);
    }
}
