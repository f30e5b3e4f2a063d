//! Point-in-time queue metrics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Snapshot of a queue's occupancy and lifetime counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueMetrics {
    /// Items currently buffered.
    pub size: usize,
    /// Fixed capacity of the queue.
    pub max_size: usize,
    /// Items rejected because the queue was full.
    pub dropped_count: u64,
    /// Items handed out through batch draining.
    pub processed_count: u64,
    /// `100 * size / max_size`.
    pub utilization_percent: f64,
}

impl QueueMetrics {
    pub(crate) fn new(
        size: usize,
        max_size: usize,
        dropped_count: u64,
        processed_count: u64,
    ) -> Self {
        let utilization_percent = if max_size == 0 {
            0.0
        } else {
            100.0 * size as f64 / max_size as f64
        };
        Self {
            size,
            max_size,
            dropped_count,
            processed_count,
            utilization_percent,
        }
    }
}

impl fmt::Display for QueueMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QueueMetrics {{ size: {}/{} ({:.1}%), dropped: {}, processed: {} }}",
            self.size,
            self.max_size,
            self.utilization_percent,
            self.dropped_count,
            self.processed_count
        )
    }
}
