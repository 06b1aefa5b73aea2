//! PostgreSQL implementations of the store traits.

pub mod notice;
pub mod notice_type;
pub mod observation;
pub mod queue;
pub mod setting;
pub mod user;

pub use notice::NoticeRepository;
pub use notice_type::NoticeTypeRepository;
pub use observation::ObservationRepository;
pub use queue::QueueRepository;
pub use setting::SettingRepository;
pub use user::UserRepository;

use notice_core::error::{AppError, ErrorKind};

/// Map a sqlx error into an application error. Unique violations become
/// conflicts and foreign key violations (e.g. a user the host never
/// mirrored) become not-found.
pub(crate) fn db_error(message: &str, err: sqlx::Error) -> AppError {
    let kind = error_kind(err.as_database_error().map(|db| db.kind()));
    AppError::with_source(kind, message, err)
}

fn error_kind(db_kind: Option<sqlx::error::ErrorKind>) -> ErrorKind {
    match db_kind {
        Some(sqlx::error::ErrorKind::UniqueViolation) => ErrorKind::Conflict,
        Some(sqlx::error::ErrorKind::ForeignKeyViolation) => ErrorKind::NotFound,
        _ => ErrorKind::Database,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violations_map_to_client_errors() {
        assert_eq!(
            error_kind(Some(sqlx::error::ErrorKind::UniqueViolation)),
            ErrorKind::Conflict
        );
        assert_eq!(
            error_kind(Some(sqlx::error::ErrorKind::ForeignKeyViolation)),
            ErrorKind::NotFound
        );
        assert_eq!(
            error_kind(Some(sqlx::error::ErrorKind::CheckViolation)),
            ErrorKind::Database
        );
        assert_eq!(error_kind(None), ErrorKind::Database);
    }
}
