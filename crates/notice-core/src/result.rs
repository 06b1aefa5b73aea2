//! Convenience result type alias for Notice.

use crate::error::AppError;

/// A specialized `Result` type for Notice operations.
pub type AppResult<T> = Result<T, AppError>;
