//! Capped consecutive-failure counter.

use crate::outcome::PollOutcome;

/// Upper bound on a source's consecutive-failure count. Keeps anything
/// derived from the count (e.g. exponential backoff) bounded.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 10;

/// Next consecutive-failure count for a source.
///
/// `Ok` and `Unavailable` reset to zero; `Failure` increments up to
/// [`MAX_CONSECUTIVE_FAILURES`].
pub fn update_fail_counter(prev: u32, outcome: PollOutcome) -> u32 {
    match outcome {
        PollOutcome::Unavailable => 0,
        PollOutcome::Failure => prev.saturating_add(1).min(MAX_CONSECUTIVE_FAILURES),
        PollOutcome::Ok => 0,
    }
}
