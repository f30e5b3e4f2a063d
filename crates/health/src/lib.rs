//! Per-source poll health: outcome classification, the capped
//! consecutive-failure counter, and backoff derived from it.

pub mod backoff;
pub mod counter;
pub mod outcome;
pub mod tracker;

pub use backoff::BackoffPolicy;
pub use counter::{update_fail_counter, MAX_CONSECUTIVE_FAILURES};
pub use outcome::{FetchError, PollOutcome};
pub use tracker::{FailureTracker, SourceHealth, SourceStatus};
