//! Poll outcome classification.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of one poll against an external source.
///
/// Exactly one case holds per poll. `Unavailable` (the resource does not
/// exist) is an expected steady state and does not count as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcome {
    Ok,
    Unavailable,
    Failure,
}

/// Errors a fetcher can report for a single poll.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("resource not found")]
    NotFound,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("timeout after {0}ms")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Whether the source answered that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound | FetchError::Status(404))
    }
}

impl PollOutcome {
    /// Classify a fetch result. Not-found is checked before anything else so
    /// it is never mistaken for a hard failure.
    pub fn from_fetch<T>(result: &Result<T, FetchError>) -> Self {
        match result {
            Err(e) if e.is_not_found() => PollOutcome::Unavailable,
            Ok(_) => PollOutcome::Ok,
            Err(_) => PollOutcome::Failure,
        }
    }

    /// Classify a textual outcome label (e.g. from a log or another process).
    ///
    /// Unrecognized labels are treated as failures.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "unavailable" | "not_found" | "notfound" => PollOutcome::Unavailable,
            "ok" | "success" => PollOutcome::Ok,
            _ => PollOutcome::Failure,
        }
    }

    /// Whether this outcome counts against the source.
    pub fn is_penalizing(self) -> bool {
        matches!(self, PollOutcome::Failure)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PollOutcome::Ok => "ok",
            PollOutcome::Unavailable => "unavailable",
            PollOutcome::Failure => "failure",
        }
    }
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
