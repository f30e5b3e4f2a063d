//! Poll log replay.
//!
//! One task per source applies that source's records in log order, so every
//! source has a single writer. Successful polls are offered to the shared
//! queue; the queue is drained in batches once all producers finish.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use pollgate_core::{Config, PollgateError};
use pollgate_health::{BackoffPolicy, FailureTracker, PollOutcome, SourceStatus};
use pollgate_queue::{QueueMetrics, SharedQueue};

/// One line of the poll log.
#[derive(Debug, Clone, Deserialize)]
pub struct PollRecord {
    pub source: String,
    pub outcome: String,
    #[serde(default)]
    pub payload: Value,
}

/// Item buffered in the queue for a successful poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolledItem {
    pub source: String,
    pub payload: Value,
}

#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    pub records: usize,
    pub skipped_lines: usize,
    pub batches: usize,
    pub drained: usize,
    pub queue: QueueMetrics,
    pub sources: Vec<SourceStatus>,
}

/// Parse a JSON-lines poll log. Blank lines are ignored; invalid lines are
/// logged and counted, never fatal.
pub fn parse_log(text: &str) -> (Vec<PollRecord>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0;

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<PollRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(line = idx + 1, error = %e, "Skipping invalid poll record");
                skipped += 1;
            }
        }
    }

    (records, skipped)
}

pub async fn load_log(path: &Path) -> Result<(Vec<PollRecord>, usize)> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PollgateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_log(&text))
}

/// Group records by source, keeping log order within each source.
fn group_by_source(records: Vec<PollRecord>) -> BTreeMap<String, Vec<PollRecord>> {
    let mut grouped: BTreeMap<String, Vec<PollRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.source.clone()).or_default().push(record);
    }
    grouped
}

pub async fn replay(
    records: Vec<PollRecord>,
    skipped_lines: usize,
    config: &Config,
) -> Result<ReplaySummary> {
    let record_count = records.len();
    let queue: SharedQueue<PolledItem> =
        SharedQueue::from_config(&config.queue).context("failed to create queue")?;
    let tracker = Arc::new(Mutex::new(FailureTracker::new(BackoffPolicy::from_config(
        &config.health,
    ))));

    let mut producers = JoinSet::new();
    for (source, source_records) in group_by_source(records) {
        let queue = queue.clone();
        let tracker = Arc::clone(&tracker);
        producers.spawn(async move {
            for record in source_records {
                let outcome = PollOutcome::from_label(&record.outcome);
                let count = {
                    let mut tracker = tracker
                        .lock()
                        .map_err(|_| anyhow!("failure tracker lock poisoned"))?;
                    tracker.record(&source, outcome)
                };
                debug!(
                    source = %source,
                    outcome = %outcome,
                    failures = count,
                    "Applied poll outcome"
                );

                if outcome == PollOutcome::Ok {
                    let item = PolledItem {
                        source: source.clone(),
                        payload: record.payload,
                    };
                    if !queue.enqueue(item) {
                        debug!(source = %source, "Queue full, poll result dropped");
                    }
                }
                tokio::task::yield_now().await;
            }
            Ok::<(), anyhow::Error>(())
        });
    }

    while let Some(joined) = producers.join_next().await {
        joined.context("producer task panicked")??;
    }

    let mut batches = 0;
    let mut drained = 0;
    loop {
        let batch = queue.dequeue_batch(config.queue.batch_size);
        if batch.is_empty() {
            break;
        }
        batches += 1;
        drained += batch.len();
        info!(batch = batches, items = batch.len(), "Consumed batch");
    }

    let sources = tracker
        .lock()
        .map_err(|_| anyhow!("failure tracker lock poisoned"))?
        .snapshot();

    let summary = ReplaySummary {
        records: record_count,
        skipped_lines,
        batches,
        drained,
        queue: queue.metrics(),
        sources,
    };

    info!(
        records = summary.records,
        drained = summary.drained,
        dropped = summary.queue.dropped_count,
        "Replay finished"
    );

    Ok(summary)
}
