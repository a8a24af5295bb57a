//! Owned periodic timers driven by the render loop

use std::time::{Duration, Instant};

/// Fixed-period timer. Dropping it cancels it.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next: Instant,
}

impl Interval {
    /// First tick fires one period after `now`
    pub fn new(period: Duration, now: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            next: now + period,
        }
    }

    #[cfg(test)]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of whole periods that elapsed up to `now`.
    ///
    /// Missed periods are all counted; the deadline advances past `now`.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        let behind = now.duration_since(self.next);
        let ticks = (behind.as_nanos() / self.period.as_nanos()) as u32 + 1;
        self.next += self.period * ticks;
        ticks
    }

    /// Push the next deadline a full period out from `now`
    pub fn reset(&mut self, now: Instant) {
        self.next = now + self.period;
    }
}
