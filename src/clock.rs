use std::convert::TryFrom;
use std::time::{Duration, Instant};

/// Monotonic microsecond clock.
///
/// Timestamps are microseconds elapsed since the clock was created, so every
/// party that compares deadlines must share the same clock value.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }

    /// Whole microseconds since creation, rounded down.
    pub fn now_us(&self) -> u64 {
        u64::try_from(self.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    /// Like [`now_us`](MonotonicClock::now_us), rounded up to the next whole microsecond.
    pub fn now_us_ceil(&self) -> u64 {
        let elapsed = self.elapsed();
        let us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        if elapsed.subsec_nanos() % 1_000 == 0 {
            us
        } else {
            us.saturating_add(1)
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
