//! Backoff and trip decisions derived from a consecutive-failure count.

use std::time::Duration;

use pollgate_core::HealthConfig;

use crate::counter::MAX_CONSECUTIVE_FAILURES;

/// Maps a failure count to a poll delay and a tripped flag.
///
/// delay = `base_delay * 2^(count - 1)`, capped at `max_delay`; zero when
/// the count is zero. With base 1s: 1s, 2s, 4s, 8s, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Count at or above which the source should be skipped.
    pub trip_threshold: u32,
}

impl BackoffPolicy {
    pub fn from_config(config: &HealthConfig) -> Self {
        Self {
            base_delay: Duration::from_millis(config.backoff_base_ms),
            max_delay: Duration::from_millis(config.backoff_max_ms),
            trip_threshold: config.trip_threshold,
        }
    }

    pub fn delay_for(&self, count: u32) -> Duration {
        if count == 0 {
            return Duration::ZERO;
        }
        let exponent = count.min(MAX_CONSECUTIVE_FAILURES) - 1;
        let factor = 1u32 << exponent;
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// A source at count zero is healthy and never tripped.
    pub fn is_tripped(&self, count: u32) -> bool {
        count > 0 && count >= self.trip_threshold
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&HealthConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(base_ms: u64, max_ms: u64, trip: u32) -> BackoffPolicy {
        BackoffPolicy::from_config(&HealthConfig {
            backoff_base_ms: base_ms,
            backoff_max_ms: max_ms,
            trip_threshold: trip,
        })
    }

    #[test]
    fn test_zero_count_has_no_delay() {
        assert_eq!(BackoffPolicy::default().delay_for(0), Duration::ZERO);
    }

    #[test]
    fn test_exponential_backoff_increases() {
        let p = policy(1_000, 600_000, 5);
        assert_eq!(p.delay_for(1), Duration::from_secs(1));
        assert_eq!(p.delay_for(2), Duration::from_secs(2));
        assert_eq!(p.delay_for(3), Duration::from_secs(4));
        assert_eq!(p.delay_for(10), Duration::from_secs(512));
    }

    #[test]
    fn test_delay_capped_at_max() {
        let p = policy(1_000, 10_000, 5);
        assert_eq!(p.delay_for(4), Duration::from_secs(8));
        assert_eq!(p.delay_for(5), Duration::from_secs(10));
        assert_eq!(p.delay_for(10), Duration::from_secs(10));
    }

    #[test]
    fn test_counts_beyond_cap_do_not_grow_delay() {
        let p = policy(1_000, u64::MAX, 5);
        assert_eq!(p.delay_for(50), p.delay_for(MAX_CONSECUTIVE_FAILURES));
    }

    #[test]
    fn test_trip_threshold() {
        let p = policy(1_000, 10_000, 3);
        assert!(!p.is_tripped(0));
        assert!(!p.is_tripped(2));
        assert!(p.is_tripped(3));
        assert!(p.is_tripped(MAX_CONSECUTIVE_FAILURES));
    }

    #[test]
    fn test_zero_threshold_never_trips_healthy_source() {
        let p = policy(1_000, 10_000, 0);
        assert!(!p.is_tripped(0));
        assert!(p.is_tripped(1));
    }
}
