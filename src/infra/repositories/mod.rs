use crate::error::AppError;

pub mod sqlite_bar_repo;
pub mod sqlite_event_repo;
pub mod sqlite_instance_repo;
pub mod sqlite_tag_repo;

pub mod postgres_bar_repo;
pub mod postgres_event_repo;
pub mod postgres_instance_repo;
pub mod postgres_tag_repo;

/// Turns a unique-constraint violation on (event_id, date) into the
/// distinct duplicate-occurrence conflict; everything else stays a
/// storage error.
///
/// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation.
pub(crate) fn duplicate_date_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        let code = db_err.code().unwrap_or_default();
        if code == "2067" || code == "23505" {
            return AppError::Conflict("An occurrence already exists for this date".to_string());
        }
    }
    AppError::Database(e)
}
