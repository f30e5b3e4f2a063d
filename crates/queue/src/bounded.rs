//! Fixed-capacity FIFO buffer with reject-on-full backpressure.
//!
//! Producers get an immediate `false` from [`BoundedQueue::enqueue`] when the
//! buffer is full; the rejected item is discarded and counted. Consumers
//! drain up to N items at a time with [`BoundedQueue::dequeue_batch`].
//! Neither side ever waits.

use std::collections::VecDeque;

use tracing::{debug, info};

use pollgate_core::QueueConfig;

use crate::error::QueueError;
use crate::metrics::QueueMetrics;

/// Bounded FIFO queue of opaque items.
///
/// Invariant: `0 <= len() <= max_size()` after every operation.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    buffer: VecDeque<T>,
    max_size: usize,
    dropped_count: u64,
    processed_count: u64,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue holding at most `max_size` items.
    ///
    /// Fails with [`QueueError::InvalidCapacity`] when `max_size` is zero.
    pub fn new(max_size: usize) -> Result<Self, QueueError> {
        if max_size == 0 {
            return Err(QueueError::InvalidCapacity { requested: 0 });
        }
        Ok(Self {
            buffer: VecDeque::with_capacity(max_size),
            max_size,
            dropped_count: 0,
            processed_count: 0,
        })
    }

    /// Create a queue from a signed capacity, as read from untyped config.
    pub fn with_capacity_i64(max_size: i64) -> Result<Self, QueueError> {
        if max_size <= 0 {
            return Err(QueueError::InvalidCapacity { requested: max_size });
        }
        let max_size = usize::try_from(max_size)
            .map_err(|_| QueueError::InvalidCapacity { requested: max_size })?;
        Self::new(max_size)
    }

    /// Create a queue sized by [`QueueConfig::max_size`].
    pub fn from_config(config: &QueueConfig) -> Result<Self, QueueError> {
        Self::new(config.max_size)
    }

    /// Append `item` at the tail.
    ///
    /// Returns `false` and discards the item when the queue is full.
    pub fn enqueue(&mut self, item: T) -> bool {
        if self.buffer.len() >= self.max_size {
            self.dropped_count = self.dropped_count.saturating_add(1);
            debug!(
                max_size = self.max_size,
                dropped_count = self.dropped_count,
                "Queue full, item rejected"
            );
            return false;
        }
        self.buffer.push_back(item);
        true
    }

    /// Remove up to `batch_size` items from the head, oldest first.
    ///
    /// Returns fewer items (possibly none) when the queue holds less.
    pub fn dequeue_batch(&mut self, batch_size: usize) -> Vec<T> {
        let take = batch_size.min(self.buffer.len());
        if take == 0 {
            return Vec::new();
        }
        let batch: Vec<T> = self.buffer.drain(..take).collect();
        self.processed_count = self.processed_count.saturating_add(batch.len() as u64);
        debug!(
            batch = batch.len(),
            remaining = self.buffer.len(),
            "Drained queue batch"
        );
        batch
    }

    /// The head item, if any, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.buffer.front()
    }

    /// Number of buffered items.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.max_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count
    }

    pub fn processed_count(&self) -> u64 {
        self.processed_count
    }

    pub fn metrics(&self) -> QueueMetrics {
        QueueMetrics::new(
            self.buffer.len(),
            self.max_size,
            self.dropped_count,
            self.processed_count,
        )
    }

    /// Drop all buffered items. Counters are left untouched.
    pub fn clear(&mut self) {
        let discarded = self.buffer.len();
        self.buffer.clear();
        info!(discarded, "Queue cleared");
    }

    /// Zero the dropped/processed counters. Buffered items are left untouched.
    pub fn reset_metrics(&mut self) {
        self.dropped_count = 0;
        self.processed_count = 0;
        info!("Queue metrics reset");
    }
}
