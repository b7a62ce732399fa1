use std::hint;
use std::thread;
use std::time::Duration;

use crate::clock::MonotonicClock;

/// Strategy for waiting out the time left before a task's deadline.
pub trait PrecisionWait: Send + Sync {
    /// Waits at least `us` microseconds and returns how many actually elapsed.
    fn wait_us(&self, clock: &MonotonicClock, us: u64) -> u64;
}

/// Spins on the clock until the target is reached.
///
/// Burns a core for the whole wait but is immune to OS sleep granularity,
/// which suits audio-buffer sized delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyPoll;

impl PrecisionWait for BusyPoll {
    fn wait_us(&self, clock: &MonotonicClock, us: u64) -> u64 {
        let start = clock.now_us();
        spin_until(clock, start.saturating_add(us));
        clock.now_us() - start
    }
}

/// Sleeps through most of the wait, then spins the last `spin_threshold_us`.
#[derive(Debug, Clone, Copy)]
pub struct Hybrid {
    pub spin_threshold_us: u64,
}

impl PrecisionWait for Hybrid {
    fn wait_us(&self, clock: &MonotonicClock, us: u64) -> u64 {
        let start = clock.now_us();
        let target = start.saturating_add(us);

        if us > self.spin_threshold_us {
            thread::sleep(Duration::from_micros(us - self.spin_threshold_us));
        }
        spin_until(clock, target);
        clock.now_us() - start
    }
}

fn spin_until(clock: &MonotonicClock, target: u64) {
    while clock.now_us() < target {
        hint::spin_loop();
    }
}

/// Config-facing selection of a [`PrecisionWait`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    BusyPoll,
    Hybrid { spin_threshold_us: u64 },
}

impl WaitStrategy {
    pub fn build(self) -> Box<dyn PrecisionWait> {
        match self {
            WaitStrategy::BusyPoll => Box::new(BusyPoll),
            WaitStrategy::Hybrid { spin_threshold_us } => Box::new(Hybrid { spin_threshold_us }),
        }
    }
}

impl Default for WaitStrategy {
    fn default() -> Self {
        WaitStrategy::BusyPoll
    }
}
