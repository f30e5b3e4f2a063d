//! End-to-end behaviour of the bounded queue as a scheduler would drive it:
//! bursts of poll results, periodic batch drains, metrics inspection.

use pollgate_core::QueueConfig;
use pollgate_queue::{BoundedQueue, QueueError, SharedQueue};

#[derive(Debug, Clone, PartialEq)]
struct PollResult {
    symbol: String,
    seq: u32,
}

fn result(symbol: &str, seq: u32) -> PollResult {
    PollResult {
        symbol: symbol.to_string(),
        seq,
    }
}

#[test]
fn burst_larger_than_capacity_is_shed_and_counted() {
    let config = QueueConfig { max_size: 5, batch_size: 2 };
    let mut queue = BoundedQueue::from_config(&config).unwrap();

    let outcomes: Vec<bool> = (0..8).map(|i| queue.enqueue(result("BTC-USD", i))).collect();
    assert_eq!(outcomes, vec![true, true, true, true, true, false, false, false]);

    let m = queue.metrics();
    assert_eq!(m.size, 5);
    assert_eq!(m.dropped_count, 3);
    assert_eq!(m.utilization_percent, 100.0);

    // The oldest results survive the burst.
    let first = queue.dequeue_batch(config.batch_size);
    assert_eq!(first, vec![result("BTC-USD", 0), result("BTC-USD", 1)]);
}

#[test]
fn draining_in_batches_empties_queue_in_order() {
    let mut queue = BoundedQueue::new(10).unwrap();
    for i in 0..7 {
        assert!(queue.enqueue(result("ETH-USD", i)));
    }

    let mut batches = Vec::new();
    loop {
        let batch = queue.dequeue_batch(3);
        if batch.is_empty() {
            break;
        }
        batches.push(batch.iter().map(|r| r.seq).collect::<Vec<_>>());
    }

    assert_eq!(batches, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
    assert_eq!(queue.processed_count(), 7);
    assert!(queue.is_empty());
}

#[test]
fn metrics_reset_between_reporting_windows() {
    let queue = SharedQueue::new(2).unwrap();
    queue.enqueue(result("SOL-USD", 1));
    queue.enqueue(result("SOL-USD", 2));
    queue.enqueue(result("SOL-USD", 3));
    queue.dequeue_batch(1);

    let window = queue.metrics();
    assert_eq!(window.dropped_count, 1);
    assert_eq!(window.processed_count, 1);

    queue.reset_metrics();
    let next = queue.metrics();
    assert_eq!(next.dropped_count, 0);
    assert_eq!(next.processed_count, 0);
    assert_eq!(next.size, 1);
    assert_eq!(queue.peek_cloned(), Some(result("SOL-USD", 2)));
}

#[test]
fn non_positive_capacity_fails_construction() {
    assert_eq!(
        BoundedQueue::<PollResult>::new(0).unwrap_err(),
        QueueError::InvalidCapacity { requested: 0 }
    );
    assert_eq!(
        BoundedQueue::<PollResult>::with_capacity_i64(-1).unwrap_err(),
        QueueError::InvalidCapacity { requested: -1 }
    );
    let msg = QueueError::InvalidCapacity { requested: -1 }.to_string();
    assert!(msg.contains("must be positive"));
}
