//! Countdown timers.

use serde::{Deserialize, Serialize};

/// A scalar countdown that is active while its remaining time is positive.
///
/// [`Countdown::tick`] only decrements while active, so the remaining time may
/// end slightly below zero but never keeps falling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
    max: f32,
}

impl Countdown {
    /// An idle countdown that refreshes to `max`.
    #[must_use]
    pub fn new(max: f32) -> Self {
        Self { remaining: 0.0, max }
    }

    /// Restart at full duration.
    pub fn refresh(&mut self) {
        self.remaining = self.max;
    }

    /// Stop immediately.
    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
        }
    }

    /// Whether time remains.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Seconds remaining (may be slightly negative once expired).
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Full duration.
    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive() {
        let timer = Countdown::new(0.5);
        assert!(!timer.is_active());
        assert_eq!(timer.max(), 0.5);
    }

    #[test]
    fn refresh_then_expire() {
        let mut timer = Countdown::new(0.1);
        timer.refresh();
        assert!(timer.is_active());
        for _ in 0..4 {
            timer.tick(0.02);
        }
        assert!(timer.is_active());
        timer.tick(0.02);
        timer.tick(0.02);
        assert!(!timer.is_active());
    }

    #[test]
    fn stops_decrementing_once_expired() {
        let mut timer = Countdown::new(0.05);
        timer.refresh();
        timer.tick(0.1);
        let after = timer.remaining();
        assert!(after < 0.0);
        timer.tick(0.1);
        assert_eq!(timer.remaining(), after);
    }

    #[test]
    fn clear_stops() {
        let mut timer = Countdown::new(1.0);
        timer.refresh();
        timer.clear();
        assert!(!timer.is_active());
    }

    #[test]
    fn zero_duration_never_activates() {
        let mut timer = Countdown::new(0.0);
        timer.refresh();
        assert!(!timer.is_active());
    }
}
