//! Queue error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("invalid capacity {requested}: max_size must be positive")]
    InvalidCapacity { requested: i64 },
}
