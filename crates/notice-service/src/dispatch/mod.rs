//! Immediate, queued and threaded dispatch of emit requests.

pub mod dispatcher;

pub use dispatcher::{DispatchOutcome, Dispatcher, EMIT_NOTICES_JOB};
