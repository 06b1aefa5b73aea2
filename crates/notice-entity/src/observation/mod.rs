//! Observation entities.

pub mod model;

pub use model::Observation;
