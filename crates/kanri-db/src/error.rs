//! Database error types for kanri-db.

use kanri_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A domain rule rejected the operation (validation, guard, missing task).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<DatabaseError> for CoreError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::Core(core) => core,
            DatabaseError::Other(other) => Self::Other(other),
            other => Self::Other(anyhow::Error::new(other)),
        }
    }
}
