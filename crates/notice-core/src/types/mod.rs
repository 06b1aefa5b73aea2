//! Core type definitions used across the Notice workspace.

pub mod id;
pub mod object_ref;
pub mod pagination;

pub use id::*;
pub use object_ref::ObjectRef;
pub use pagination::{PageRequest, PageResponse};
