//! One-click unsubscribe links.

pub mod service;

pub use service::{UnsubscribeOutcome, UnsubscribeService};
