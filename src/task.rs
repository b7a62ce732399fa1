use std::fmt;

use crate::clock::MonotonicClock;

pub trait Delayed {
    /// Absolute deadline in microseconds on the scheduler's [`MonotonicClock`].
    fn deadline(&self) -> u64;
}

pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// A callback paired with the instant before which it must not run.
pub struct Task {
    callback: Callback,
    deadline: u64,
}

impl Task {
    pub fn new<F>(callback: F, deadline: u64) -> Self
        where F: FnOnce() + Send + 'static
    {
        Task {
            callback: Box::new(callback),
            deadline,
        }
    }

    /// Stamps the deadline as `now + delay_us`. The deadline is never recomputed.
    ///
    /// `now` is rounded up so that sub-microsecond submission time cannot make
    /// the task run early.
    pub fn after<F>(clock: &MonotonicClock, delay_us: u64, callback: F) -> Self
        where F: FnOnce() + Send + 'static
    {
        Task::new(callback, clock.now_us_ceil().saturating_add(delay_us))
    }

    /// Consumes the task and invokes its callback on the current thread.
    pub fn run(self) {
        (self.callback)()
    }
}

impl Delayed for Task {
    fn deadline(&self) -> u64 {
        self.deadline
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("deadline", &self.deadline)
            .finish()
    }
}
