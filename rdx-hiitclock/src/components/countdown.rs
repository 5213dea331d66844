//! The countdown clock: a single remaining-time value drained in fixed quanta.

/// Outcome of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// The clock is paused or already at zero; nothing changed.
    Idle,
    /// Time was subtracted and some remains.
    Counting,
    /// This tick brought the remaining time to exactly zero.
    ZeroCrossing,
}

/// A millisecond countdown advanced by an external periodic tick source.
///
/// Each tick subtracts a fixed `period_ms`, so pausing needs no drift
/// correction: the remaining time is untouched until ticks resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining_ms: u64,
    running: bool,
    period_ms: u64,
}

impl Countdown {
    pub fn new(period_ms: u64) -> Self {
        Self {
            remaining_ms: 0,
            running: false,
            period_ms,
        }
    }

    pub fn start(&mut self, initial_ms: u64) {
        self.remaining_ms = initial_ms;
        self.running = true;
    }

    /// Loads a new phase duration without touching the running flag.
    pub(crate) fn reload(&mut self, remaining_ms: u64) {
        self.remaining_ms = remaining_ms;
    }

    /// Returns `true` if the clock was running.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Returns `true` if the clock went from paused to running.
    ///
    /// Resuming at zero is a no-op: there is nothing left to count.
    pub fn resume(&mut self) -> bool {
        if self.running || self.remaining_ms == 0 {
            return false;
        }
        self.running = true;
        true
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.remaining_ms = 0;
    }

    pub fn tick(&mut self) -> TickResult {
        if !self.running || self.remaining_ms == 0 {
            return TickResult::Idle;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(self.period_ms);
        if self.remaining_ms == 0 {
            TickResult::ZeroCrossing
        } else {
            TickResult::Counting
        }
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_down_in_fixed_quanta() {
        let mut clock = Countdown::new(10);
        clock.start(30);
        assert_eq!(clock.tick(), TickResult::Counting);
        assert_eq!(clock.remaining_ms(), 20);
        assert_eq!(clock.tick(), TickResult::Counting);
        assert_eq!(clock.tick(), TickResult::ZeroCrossing);
        assert_eq!(clock.remaining_ms(), 0);
        // Only one zero-crossing per countdown.
        assert_eq!(clock.tick(), TickResult::Idle);
        assert!(clock.is_running());
    }

    #[test]
    fn clamps_at_zero_when_quantum_overshoots() {
        let mut clock = Countdown::new(10);
        clock.start(15);
        assert_eq!(clock.tick(), TickResult::Counting);
        assert_eq!(clock.tick(), TickResult::ZeroCrossing);
        assert_eq!(clock.remaining_ms(), 0);
    }

    #[test]
    fn pause_preserves_remaining_time() {
        let mut clock = Countdown::new(10);
        clock.start(1_000);
        clock.tick();
        assert!(clock.pause());
        assert!(!clock.pause());
        assert_eq!(clock.tick(), TickResult::Idle);
        assert_eq!(clock.remaining_ms(), 990);
        assert!(clock.resume());
        assert!(!clock.resume());
        assert_eq!(clock.remaining_ms(), 990);
    }

    #[test]
    fn resume_at_zero_is_a_no_op() {
        let mut clock = Countdown::new(10);
        assert!(!clock.resume());
        clock.start(10);
        clock.pause();
        clock.stop();
        assert!(!clock.resume());
        assert!(!clock.is_running());
        assert_eq!(clock.remaining_ms(), 0);
    }
}
