use crate::precision_wait::WaitStrategy;

pub(crate) const DEFAULT_THREAD_NAME: &str = "delay-scheduler";
pub(crate) const DEFAULT_LATE_THRESHOLD_US: u64 = 1_000;

/// Settings applied when a [`Scheduler`](crate::Scheduler) starts its worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Name given to the worker OS thread.
    pub thread_name: String,
    pub wait: WaitStrategy,
    /// Initial queue allocation. Does not bound the queue.
    pub queue_capacity: usize,
    /// Tasks starting later than this past their deadline are logged at debug level.
    pub late_threshold_us: u64,
}

impl SchedulerConfig {
    pub fn with_thread_name<S: Into<String>>(mut self, name: S) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn with_wait(mut self, wait: WaitStrategy) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_late_threshold_us(mut self, us: u64) -> Self {
        self.late_threshold_us = us;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            wait: WaitStrategy::BusyPoll,
            queue_capacity: 0,
            late_threshold_us: DEFAULT_LATE_THRESHOLD_US,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);
        assert_eq!(config.late_threshold_us, DEFAULT_LATE_THRESHOLD_US);
        assert_eq!(config.wait, WaitStrategy::BusyPoll);
        assert_eq!(config.queue_capacity, 0);
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = SchedulerConfig::default()
            .with_thread_name("audio-timer")
            .with_wait(WaitStrategy::Hybrid { spin_threshold_us: 2_000 })
            .with_queue_capacity(64)
            .with_late_threshold_us(250);

        assert_eq!(config.thread_name, "audio-timer");
        assert_eq!(config.wait, WaitStrategy::Hybrid { spin_threshold_us: 2_000 });
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.late_threshold_us, 250);
        assert_ne!(config, SchedulerConfig::default());
    }
}
