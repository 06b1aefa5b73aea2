//! Built-in job handler implementations.

pub mod cleanup;
pub mod emit;

pub use cleanup::{NOTICE_CLEANUP_JOB, NoticeCleanupJobHandler};
pub use emit::EmitNoticesJobHandler;
