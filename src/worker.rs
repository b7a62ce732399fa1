use std::process;
use std::sync::Arc;
use std::thread;

use tracing::{debug, error, trace};

use crate::blocking_delay_queue::{BlockingDelayQueue, DelayQueue};
use crate::clock::MonotonicClock;
use crate::precision_wait::PrecisionWait;
use crate::task::{Delayed, Task};

/// Consumer side of the scheduler. Exactly one exists per started scheduler.
pub(crate) struct Worker {
    pub(crate) queue: Arc<BlockingDelayQueue<Task>>,
    pub(crate) clock: MonotonicClock,
    pub(crate) wait: Box<dyn PrecisionWait>,
    pub(crate) late_threshold_us: u64,
}

impl Worker {
    /// Runs until the process exits. A panicking callback aborts the process.
    pub(crate) fn run(self) {
        debug!("scheduler worker started");
        loop {
            let task = self.queue.take();
            self.execute(task);
        }
    }

    /// Waits out the task's remaining time, if any, then runs it.
    /// Returns the microseconds spent waiting.
    fn execute(&self, task: Task) -> u64 {
        let deadline = task.deadline();
        let now = self.clock.now_us();

        let waited = if deadline > now {
            self.wait.wait_us(&self.clock, deadline - now)
        } else {
            let late = now - deadline;
            if late > self.late_threshold_us {
                debug!(deadline, late_us = late, "task started past its deadline");
            }
            0
        };

        trace!(deadline, waited_us = waited, "running task");
        let _guard = AbortOnUnwind;
        task.run();
        waited
    }
}

/// Turns a callback panic into a process abort instead of a silently dead worker.
struct AbortOnUnwind;

impl Drop for AbortOnUnwind {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("scheduler callback panicked, aborting");
            process::abort();
        }
    }
}
