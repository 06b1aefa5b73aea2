//! Queued send batches.

pub mod model;
pub mod status;

pub use model::{EnqueueBatch, QueuedBatch};
pub use status::BatchStatus;
