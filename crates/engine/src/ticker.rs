//! Fixed-interval tick source.
//!
//! The ticker does not own a thread or a timer. The host feeds it elapsed
//! wall-clock time and it reports how many whole intervals have passed,
//! carrying the remainder over to the next call.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    accumulated: Duration,
    active: bool,
}

impl Ticker {
    /// Create a cancelled ticker. `interval` must be non-zero.
    pub fn new(interval: Duration) -> Self {
        debug_assert!(!interval.is_zero());
        Self {
            interval,
            accumulated: Duration::ZERO,
            active: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// (Re)arm the ticker; the first tick is one full interval away.
    pub fn start(&mut self) {
        self.active = true;
        self.accumulated = Duration::ZERO;
    }

    /// Stop producing ticks. Cancelling twice is the same as cancelling once.
    pub fn cancel(&mut self) {
        self.active = false;
        self.accumulated = Duration::ZERO;
    }

    /// Account for `elapsed` time and return the number of ticks now due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.active || self.interval.is_zero() {
            return 0;
        }

        let total = self.accumulated.as_nanos() + elapsed.as_nanos();
        let step = self.interval.as_nanos();
        let due = total / step;
        self.accumulated = Duration::from_nanos((total % step) as u64);
        due.min(u32::MAX as u128) as u32
    }

    /// Time left until the next tick, or `None` while cancelled.
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.active.then(|| self.interval.saturating_sub(self.accumulated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_new_ticker_is_cancelled() {
        let mut ticker = Ticker::new(ms(700));
        assert!(!ticker.is_active());
        assert_eq!(ticker.advance(ms(5000)), 0);
        assert_eq!(ticker.time_until_next_tick(), None);
    }

    #[test]
    fn test_due_tick_counting_carries_remainder() {
        let mut ticker = Ticker::new(ms(700));
        ticker.start();

        assert_eq!(ticker.advance(ms(699)), 0);
        assert_eq!(ticker.time_until_next_tick(), Some(ms(1)));
        assert_eq!(ticker.advance(ms(1)), 1);
        assert_eq!(ticker.advance(ms(1400)), 2);
        assert_eq!(ticker.advance(ms(1050)), 1);
        assert_eq!(ticker.advance(ms(350)), 1);
    }

    #[test]
    fn test_cancel_is_idempotent_and_stops_ticks() {
        let mut ticker = Ticker::new(ms(100));
        ticker.start();
        ticker.advance(ms(50));

        ticker.cancel();
        ticker.cancel();
        assert!(!ticker.is_active());
        assert_eq!(ticker.advance(ms(1000)), 0);

        // Restarting forgets the partial interval from before the cancel.
        ticker.start();
        assert_eq!(ticker.advance(ms(50)), 0);
        assert_eq!(ticker.advance(ms(50)), 1);
    }

    #[test]
    fn test_start_resets_accumulated_time() {
        let mut ticker = Ticker::new(ms(100));
        ticker.start();
        ticker.advance(ms(90));
        ticker.start();
        assert_eq!(ticker.time_until_next_tick(), Some(ms(100)));
    }
}
