//! Website notice entities.

pub mod model;

pub use model::{CreateNotice, Notice};
