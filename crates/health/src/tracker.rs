//! Per-source failure state, owned by the scheduler.
//!
//! The tracker is a plain map from source key (e.g. a symbol) to its
//! [`SourceHealth`]. It has no interior locking: a host with concurrent
//! pollers wraps it in a lock or keeps one writer per source.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backoff::BackoffPolicy;
use crate::counter::{update_fail_counter, MAX_CONSECUTIVE_FAILURES};
use crate::outcome::PollOutcome;

/// Health of one polled source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceHealth {
    pub consecutive_failures: u32,
    pub last_outcome: PollOutcome,
    pub updated_at: DateTime<Utc>,
}

/// Serializable view of a source, with the backoff decision applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub source: String,
    pub consecutive_failures: u32,
    pub last_outcome: PollOutcome,
    pub updated_at: DateTime<Utc>,
    pub backoff_ms: u64,
    pub tripped: bool,
}

#[derive(Debug, Default)]
pub struct FailureTracker {
    sources: HashMap<String, SourceHealth>,
    policy: BackoffPolicy,
}

impl FailureTracker {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            sources: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Apply one poll outcome to `source` and return its new count.
    ///
    /// Unknown sources start from zero.
    pub fn record(&mut self, source: &str, outcome: PollOutcome) -> u32 {
        let now = Utc::now();
        let prev = self.count(source);
        let next = update_fail_counter(prev, outcome);

        match self.sources.get_mut(source) {
            Some(health) => {
                health.consecutive_failures = next;
                health.last_outcome = outcome;
                health.updated_at = now;
            }
            None => {
                self.sources.insert(
                    source.to_string(),
                    SourceHealth {
                        consecutive_failures: next,
                        last_outcome: outcome,
                        updated_at: now,
                    },
                );
            }
        }

        if next == MAX_CONSECUTIVE_FAILURES && prev < MAX_CONSECUTIVE_FAILURES {
            warn!(source, failures = next, "Source reached failure cap");
        } else if prev > 0 && next == 0 {
            info!(source, previous_failures = prev, outcome = %outcome, "Source recovered");
        }

        next
    }

    /// Current count for `source`; zero if it has never been recorded.
    pub fn count(&self, source: &str) -> u32 {
        self.sources
            .get(source)
            .map(|h| h.consecutive_failures)
            .unwrap_or(0)
    }

    pub fn get(&self, source: &str) -> Option<&SourceHealth> {
        self.sources.get(source)
    }

    /// Delay the scheduler should wait before polling `source` again.
    pub fn backoff_for(&self, source: &str) -> std::time::Duration {
        self.policy.delay_for(self.count(source))
    }

    pub fn is_tripped(&self, source: &str) -> bool {
        self.policy.is_tripped(self.count(source))
    }

    /// Forget failures for `source` without removing it.
    pub fn reset(&mut self, source: &str) {
        if let Some(health) = self.sources.get_mut(source) {
            health.consecutive_failures = 0;
            health.updated_at = Utc::now();
        }
    }

    pub fn remove(&mut self, source: &str) -> Option<SourceHealth> {
        self.sources.remove(source)
    }

    /// Known source keys, sorted.
    pub fn sources(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.sources.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Status of every known source, sorted by key.
    pub fn snapshot(&self) -> Vec<SourceStatus> {
        let mut statuses: Vec<SourceStatus> = self
            .sources
            .iter()
            .map(|(source, h)| {
                let delay = self.policy.delay_for(h.consecutive_failures);
                SourceStatus {
                    source: source.clone(),
                    consecutive_failures: h.consecutive_failures,
                    last_outcome: h.last_outcome,
                    updated_at: h.updated_at,
                    backoff_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    tripped: self.policy.is_tripped(h.consecutive_failures),
                }
            })
            .collect();
        statuses.sort_by(|a, b| a.source.cmp(&b.source));
        statuses
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
