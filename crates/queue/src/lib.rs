pub mod bounded;
pub mod error;
pub mod metrics;
pub mod shared;

pub use bounded::BoundedQueue;
pub use error::QueueError;
pub use metrics::QueueMetrics;
pub use shared::SharedQueue;
