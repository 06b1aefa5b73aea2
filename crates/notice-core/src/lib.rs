//! # notice-core
//!
//! Core crate for the Notice service. Contains configuration schemas,
//! typed identifiers, object references, pagination types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Notice crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
