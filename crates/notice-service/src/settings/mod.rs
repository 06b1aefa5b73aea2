//! Per-user notice settings.

pub mod service;

pub use service::{SettingsRow, SettingsService, SettingsTable};
