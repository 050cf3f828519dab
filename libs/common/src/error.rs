//! Custom error types for the common library
//!
//! This module defines the database error taxonomy shared by the services.
//! Raw `sqlx` errors are classified once here so that adapters can decide
//! how each class surfaces to their callers.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// No connection could be acquired, or the operation ran past its deadline
    #[error("Database operation timed out")]
    Timeout,

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::Database(ref db) if db.is_unique_violation() => {
                DatabaseError::UniqueViolation {
                    constraint: db.constraint().unwrap_or("unknown").to_string(),
                }
            }
            SqlxError::PoolTimedOut => DatabaseError::Timeout,
            SqlxError::Io(_)
            | SqlxError::Tls(_)
            | SqlxError::PoolClosed
            | SqlxError::WorkerCrashed => DatabaseError::Connection(err),
            other => DatabaseError::Query(other),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_classified_as_timeout() {
        let err = DatabaseError::from(SqlxError::PoolTimedOut);
        assert!(matches!(err, DatabaseError::Timeout));
    }

    #[test]
    fn closed_pool_is_a_connection_failure() {
        let err = DatabaseError::from(SqlxError::PoolClosed);
        assert!(matches!(err, DatabaseError::Connection(_)));
    }

    #[test]
    fn missing_row_is_a_query_failure() {
        let err = DatabaseError::from(SqlxError::RowNotFound);
        assert!(matches!(err, DatabaseError::Query(_)));
    }
}
