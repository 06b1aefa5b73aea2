//! # notice-entity
//!
//! Domain entity models for Notice. Every struct in this crate represents a
//! database table row or a domain value object. Table rows additionally
//! derive `sqlx::FromRow`.

pub mod batch;
pub mod medium;
pub mod notice;
pub mod notice_type;
pub mod observation;
pub mod setting;
pub mod user;
