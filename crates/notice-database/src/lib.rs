//! # notice-database
//!
//! Persistence for Notice: the store traits the services depend on, the
//! PostgreSQL repositories implementing them, and an in-memory store used
//! for development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use stores::Stores;
