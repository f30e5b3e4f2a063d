//! Thread-safe handle around [`BoundedQueue`].
//!
//! Every method takes the lock once, so check-then-append and batch splicing
//! are atomic with respect to other producers and consumers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pollgate_core::QueueConfig;

use crate::bounded::BoundedQueue;
use crate::error::QueueError;
use crate::metrics::QueueMetrics;

/// Cloneable, shareable bounded queue. Clones refer to the same buffer.
#[derive(Debug)]
pub struct SharedQueue<T> {
    inner: Arc<Mutex<BoundedQueue<T>>>,
}

impl<T> Clone for SharedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedQueue<T> {
    pub fn new(max_size: usize) -> Result<Self, QueueError> {
        Ok(Self::from_queue(BoundedQueue::new(max_size)?))
    }

    pub fn from_config(config: &QueueConfig) -> Result<Self, QueueError> {
        Self::new(config.max_size)
    }

    pub fn from_queue(queue: BoundedQueue<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(queue)),
        }
    }

    // Operations never leave the queue half-updated, so a poisoned lock
    // still guards a valid queue.
    fn lock(&self) -> MutexGuard<'_, BoundedQueue<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, item: T) -> bool {
        self.lock().enqueue(item)
    }

    pub fn dequeue_batch(&self, batch_size: usize) -> Vec<T> {
        self.lock().dequeue_batch(batch_size)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lock().is_full()
    }

    pub fn max_size(&self) -> usize {
        self.lock().max_size()
    }

    pub fn metrics(&self) -> QueueMetrics {
        self.lock().metrics()
    }

    pub fn clear(&self) {
        self.lock().clear()
    }

    pub fn reset_metrics(&self) {
        self.lock().reset_metrics()
    }
}

impl<T: Clone> SharedQueue<T> {
    /// Clone of the head item, if any.
    pub fn peek_cloned(&self) -> Option<T> {
        self.lock().peek().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread;

    #[test]
    fn test_clones_share_state() {
        let queue = SharedQueue::new(4).unwrap();
        let producer = queue.clone();
        assert!(producer.enqueue("a"));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.peek_cloned(), Some("a"));
    }

    #[test]
    fn test_invalid_capacity() {
        assert!(matches!(
            SharedQueue::<u8>::new(0),
            Err(QueueError::InvalidCapacity { requested: 0 })
        ));
    }

    #[test]
    fn test_concurrent_producers_respect_capacity() {
        let queue = SharedQueue::new(100).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let q = queue.clone();
                thread::spawn(move || {
                    let mut accepted = 0u64;
                    for i in 0..50 {
                        if q.enqueue(t * 1000 + i) {
                            accepted += 1;
                        }
                    }
                    accepted
                })
            })
            .collect();

        let accepted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        let m = queue.metrics();
        assert_eq!(accepted, 100);
        assert_eq!(m.size, 100);
        assert_eq!(m.dropped_count, 300);
    }

    #[test]
    fn test_concurrent_producer_and_consumer_account_for_every_item() {
        let queue = SharedQueue::new(16).unwrap();
        let producer = {
            let q = queue.clone();
            thread::spawn(move || {
                let mut accepted = 0u64;
                for i in 0..1000u32 {
                    if q.enqueue(i) {
                        accepted += 1;
                    }
                }
                accepted
            })
        };
        let consumer = {
            let q = queue.clone();
            thread::spawn(move || {
                let mut seen = Vec::new();
                for _ in 0..200 {
                    seen.extend(q.dequeue_batch(8));
                    assert!(q.len() <= 16);
                    thread::yield_now();
                }
                seen
            })
        };

        let accepted = producer.join().unwrap();
        let mut seen = consumer.join().unwrap();
        seen.extend(queue.dequeue_batch(usize::MAX));

        // Per-producer FIFO: accepted items come out in increasing order.
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen.len() as u64, accepted);

        let m = queue.metrics();
        assert_eq!(m.processed_count, accepted);
        assert_eq!(m.dropped_count + accepted, 1000);
    }

    #[tokio::test]
    async fn test_usable_from_tasks() {
        let queue = SharedQueue::new(3).unwrap();
        let q = queue.clone();
        let accepted = tokio::spawn(async move { (0..5).filter(|i| q.enqueue(*i)).count() })
            .await
            .unwrap();
        assert_eq!(accepted, 3);
        assert_eq!(queue.dequeue_batch(2), vec![0, 1]);
        assert_eq!(queue.metrics().dropped_count, 2);
    }
}
