use std::convert::TryFrom;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

use once_cell::sync::{Lazy, OnceCell};
use tracing::debug;

use crate::blocking_delay_queue::{BlockingDelayQueue, DelayQueue};
use crate::clock::MonotonicClock;
use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::task::Task;
use crate::worker::Worker;

static GLOBAL: Lazy<Scheduler> = Lazy::new(Scheduler::default);

/// Runs delayed callbacks on a single background thread.
///
/// Callbacks run in the order they were submitted, each no earlier than its
/// own deadline. A task with a short delay submitted after a task with a long
/// delay waits for the long one to run first.
///
/// The queue and worker thread are created once, by the first call to
/// [`ensure_started`](Scheduler::ensure_started) or
/// [`submit`](Scheduler::submit), and live until the process exits. Dropping
/// the scheduler does not stop the worker.
///
/// Callbacks run unguarded. A panicking callback aborts the process.
pub struct Scheduler {
    config: SchedulerConfig,
    clock: MonotonicClock,
    state: OnceCell<Started>,
}

struct Started {
    queue: Arc<BlockingDelayQueue<Task>>,
    worker: JoinHandle<()>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Scheduler {
            config,
            clock: MonotonicClock::new(),
            state: OnceCell::new(),
        }
    }

    /// Process-wide scheduler with the default configuration.
    pub fn global() -> &'static Scheduler {
        &GLOBAL
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn clock(&self) -> &MonotonicClock {
        &self.clock
    }

    /// Creates the queue and the worker thread if they do not exist yet.
    ///
    /// # Panics
    ///
    /// Panics if the worker thread cannot be spawned.
    pub fn ensure_started(&self) {
        if let Err(e) = self.try_ensure_started() {
            panic!("{}", e);
        }
    }

    /// Like [`ensure_started`](Scheduler::ensure_started), but reports a spawn failure.
    /// Concurrent callers race safely: exactly one queue and one thread are created.
    pub fn try_ensure_started(&self) -> Result<()> {
        self.started().map(|_| ())
    }

    fn started(&self) -> Result<&Started> {
        self.state.get_or_try_init(|| self.start())
    }

    fn start(&self) -> Result<Started> {
        let queue = Arc::new(BlockingDelayQueue::new_with_capacity(self.config.queue_capacity));
        let worker = Worker {
            queue: Arc::clone(&queue),
            clock: self.clock,
            wait: self.config.wait.build(),
            late_threshold_us: self.config.late_threshold_us,
        };

        let worker = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || worker.run())?;
        debug!(thread = %self.config.thread_name, wait = ?self.config.wait, "scheduler started");

        Ok(Started { queue, worker })
    }

    /// Schedules `callback` to run on the worker no earlier than `delay_us`
    /// microseconds from now. Returns immediately.
    ///
    /// Starts the scheduler if needed.
    ///
    /// # Panics
    ///
    /// Panics if the worker thread has to be started and cannot be spawned.
    pub fn submit<F>(&self, delay_us: u64, callback: F)
        where F: FnOnce() + Send + 'static
    {
        if let Err(e) = self.try_submit(delay_us, callback) {
            panic!("{}", e);
        }
    }

    pub fn try_submit<F>(&self, delay_us: u64, callback: F) -> Result<()>
        where F: FnOnce() + Send + 'static
    {
        let started = self.started()?;
        started.queue.add(Task::after(&self.clock, delay_us, callback));
        Ok(())
    }

    /// [`submit`](Scheduler::submit) with the delay truncated to whole microseconds.
    pub fn submit_after<F>(&self, delay: Duration, callback: F)
        where F: FnOnce() + Send + 'static
    {
        let delay_us = u64::try_from(delay.as_micros()).unwrap_or(u64::MAX);
        self.submit(delay_us, callback)
    }

    /// Tasks submitted but not yet taken by the worker.
    pub fn pending(&self) -> usize {
        self.state.get().map_or(0, |s| s.queue.size())
    }

    pub fn is_started(&self) -> bool {
        self.state.get().is_some()
    }

    /// `false` before start.
    pub fn is_running(&self) -> bool {
        self.state.get().map_or(false, |s| !s.worker.is_finished())
    }

    pub fn worker_thread_id(&self) -> Option<ThreadId> {
        self.state.get().map(|s| s.worker.thread().id())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
