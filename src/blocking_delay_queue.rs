use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::trace;

use crate::task::Delayed;

/// Queue of delayed elements.
///
/// Elements leave in insertion order, not deadline order: an element added
/// later with an earlier deadline waits behind everything added before it.
pub trait DelayQueue<T>
    where T: Delayed
{
    /// Appends `e` at the tail. Never blocks beyond the internal lock.
    fn add(&self, e: T);

    /// Removes the head, suspending the caller while the queue is empty.
    fn take(&self) -> T;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool;
}

/// Unbounded FIFO queue for many producers and a single consumer.
pub struct BlockingDelayQueue<T>
{
    items: Mutex<VecDeque<T>>,
    condvar: Condvar,
}

impl<T> BlockingDelayQueue<T>
    where T: Delayed
{
    pub fn new_unbounded() -> Self {
        BlockingDelayQueue {
            items: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
        }
    }

    /// `capacity` only pre-allocates; the queue still grows without bound.
    pub fn new_with_capacity(capacity: usize) -> Self {
        BlockingDelayQueue {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            condvar: Condvar::new(),
        }
    }

    fn items_mutex(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock()
    }
}


impl<T> DelayQueue<T> for BlockingDelayQueue<T>
    where T: Delayed
{
    fn add(&self, e: T) {
        let mut items = self.items_mutex();
        let was_empty = items.is_empty();
        trace!(deadline = e.deadline(), depth = items.len() + 1, "enqueue");
        items.push_back(e);

        // Only the single consumer can be waiting, and only on an empty queue.
        if was_empty {
            self.condvar.notify_one();
        }
    }

    fn take(&self) -> T {
        let mut items = self.items_mutex();
        loop {
            if let Some(e) = items.pop_front() {
                return e;
            }
            self.condvar.wait(&mut items);
        }
    }

    fn size(&self) -> usize {
        self.items_mutex().len()
    }

    fn is_empty(&self) -> bool {
        self.items_mutex().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    struct Item(u64);

    impl Delayed for Item {
        fn deadline(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn take_returns_insertion_order_not_deadline_order() {
        let queue = BlockingDelayQueue::new_unbounded();
        queue.add(Item(1_000_000));
        queue.add(Item(1_000));
        queue.add(Item(500_000));

        assert_eq!(queue.take(), Item(1_000_000));
        assert_eq!(queue.take(), Item(1_000));
        assert_eq!(queue.take(), Item(500_000));
        assert!(queue.is_empty());
    }

    #[test]
    fn size_tracks_adds_and_takes() {
        let queue = BlockingDelayQueue::new_with_capacity(2);
        assert_eq!(queue.size(), 0);
        for d in 0..5 {
            queue.add(Item(d));
        }
        // capacity is a hint, not a bound
        assert_eq!(queue.size(), 5);
        queue.take();
        assert_eq!(queue.size(), 4);
    }

    #[test]
    fn take_blocks_until_add() {
        let queue = Arc::new(BlockingDelayQueue::new_unbounded());
        let taken = Arc::new(AtomicBool::new(false));

        let consumer = {
            let queue = Arc::clone(&queue);
            let taken = Arc::clone(&taken);
            thread::spawn(move || {
                let item = queue.take();
                taken.store(true, Ordering::SeqCst);
                item
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!taken.load(Ordering::SeqCst));

        queue.add(Item(7));
        assert_eq!(consumer.join().unwrap(), Item(7));
        assert!(taken.load(Ordering::SeqCst));
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        const PRODUCERS: u64 = 8;
        const PER_PRODUCER: u64 = 250;

        let queue = Arc::new(BlockingDelayQueue::new_unbounded());
        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        queue.add(Item(p * PER_PRODUCER + i));
                    }
                })
            })
            .collect();

        let mut seen = Vec::new();
        for _ in 0..PRODUCERS * PER_PRODUCER {
            seen.push(queue.take().0);
        }
        for p in producers {
            p.join().unwrap();
        }

        // each producer's own items keep their relative order
        for p in 0..PRODUCERS {
            let own: Vec<_> = seen
                .iter()
                .copied()
                .filter(|v| v / PER_PRODUCER == p)
                .collect();
            let expected: Vec<_> = (p * PER_PRODUCER..(p + 1) * PER_PRODUCER).collect();
            assert_eq!(own, expected);
        }
        assert!(queue.is_empty());
    }
}
