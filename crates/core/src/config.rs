use std::env;

use serde::{Deserialize, Serialize};

use crate::error::PollgateError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub queue: QueueConfig,
    pub health: HealthConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `POLLGATE_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("POLLGATE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            queue: QueueConfig::from_env_profiled(p),
            health: HealthConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Reject values the queue and tracker cannot be built from.
    pub fn validate(&self) -> Result<(), PollgateError> {
        if self.queue.max_size == 0 {
            return Err(PollgateError::Config("QUEUE_MAX_SIZE must be positive".into()));
        }
        if self.queue.batch_size == 0 {
            return Err(PollgateError::Config("QUEUE_BATCH_SIZE must be positive".into()));
        }
        // A zero threshold would trip sources sitting at count 0.
        if self.health.trip_threshold == 0 {
            return Err(PollgateError::Config("HEALTH_TRIP_THRESHOLD must be positive".into()));
        }
        if self.health.backoff_max_ms < self.health.backoff_base_ms {
            return Err(PollgateError::Config(format!(
                "HEALTH_BACKOFF_MAX_MS ({}) is below HEALTH_BACKOFF_BASE_MS ({})",
                self.health.backoff_max_ms, self.health.backoff_base_ms
            )));
        }
        Ok(())
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  queue:   max_size={}, batch_size={}",
            self.queue.max_size,
            self.queue.batch_size
        );
        tracing::info!(
            "  health:  backoff_base_ms={}, backoff_max_ms={}, trip_threshold={}",
            self.health.backoff_base_ms,
            self.health.backoff_max_ms,
            self.health.trip_threshold
        );
    }
}

// ── Queue ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Hard ceiling on buffered items.
    pub max_size: usize,
    /// Items handed to the consumer per drain.
    pub batch_size: usize,
}

impl QueueConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            max_size: profiled_env_usize(p, "QUEUE_MAX_SIZE", defaults.max_size),
            batch_size: profiled_env_usize(p, "QUEUE_BATCH_SIZE", defaults.batch_size),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            batch_size: 100,
        }
    }
}

// ── Source health ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    /// Consecutive failures at which a source is considered tripped.
    pub trip_threshold: u32,
}

impl HealthConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            backoff_base_ms: profiled_env_u64(
                p,
                "HEALTH_BACKOFF_BASE_MS",
                defaults.backoff_base_ms,
            ),
            backoff_max_ms: profiled_env_u64(p, "HEALTH_BACKOFF_MAX_MS", defaults.backoff_max_ms),
            trip_threshold: profiled_env_u32(p, "HEALTH_TRIP_THRESHOLD", defaults.trip_threshold),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            backoff_base_ms: 1_000,
            backoff_max_ms: 300_000,
            trip_threshold: 5,
        }
    }
}
