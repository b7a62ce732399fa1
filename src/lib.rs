//! A single worker scheduler that runs delayed callbacks in submission order.
//!
//! Producers on any thread submit a callback with a delay in microseconds. One
//! background thread takes tasks in the order they were submitted, waits out
//! each deadline with a precision wait and runs the callback.
mod blocking_delay_queue;
mod clock;
mod config;
mod error;
mod precision_wait;
mod scheduler;
mod task;
mod worker;

pub use self::blocking_delay_queue::{BlockingDelayQueue, DelayQueue};
pub use self::clock::MonotonicClock;
pub use self::config::SchedulerConfig;
pub use self::error::{Error, Result};
pub use self::precision_wait::{BusyPoll, Hybrid, PrecisionWait, WaitStrategy};
pub use self::scheduler::Scheduler;
pub use self::task::{Callback, Delayed, Task};

/// Starts the process-wide [`Scheduler`] if it is not running yet.
pub fn ensure_started() {
    Scheduler::global().ensure_started()
}

/// Schedules `callback` on the process-wide [`Scheduler`], no earlier than
/// `delay_us` microseconds from now.
pub fn submit<F>(delay_us: u64, callback: F)
    where F: FnOnce() + Send + 'static
{
    Scheduler::global().submit(delay_us, callback)
}
