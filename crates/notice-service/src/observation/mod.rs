//! Users observing host objects.

pub mod service;

pub use service::{ObservationNotice, ObservationService};
