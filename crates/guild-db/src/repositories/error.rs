//! Error handling utilities for repositories

use guild_core::error::DomainError;
use sqlx::error::ErrorKind;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError.
///
/// Constraint violations become `Integrity`, transport-level failures become
/// `Connectivity`, and everything else (bad SQL, decode errors) is `Database`.
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        return match db_err.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => DomainError::Integrity(db_err.message().to_string()),
            _ => DomainError::Database(db_err.message().to_string()),
        };
    }

    match e {
        SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::Protocol(_)
        | SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::WorkerCrashed => DomainError::Connectivity(e.to_string()),
        other => DomainError::Database(other.to_string()),
    }
}
