//! Storage-specific error type wrapping sqlx errors.

use smarthome_domain::error::{ConflictError, SmartHomeError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for SmartHomeError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(sqlx::Error::Database(db_err))
                if db_err.is_unique_violation() =>
            {
                Self::Conflict(ConflictError::AlreadyExists)
            }
            other => Self::Storage(Box::new(other)),
        }
    }
}
