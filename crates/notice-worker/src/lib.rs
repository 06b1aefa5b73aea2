//! Background batch processing and scheduled tasks for Notice.
//!
//! This crate provides:
//! - A worker runner that polls the batch queue and executes batches
//! - A cron scheduler that enqueues the periodic inbox cleanup
//! - A job executor that dispatches batches to the correct handler
//! - The `emit_notices` and `notice_cleanup` job handlers

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use queue::JobQueue;
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
