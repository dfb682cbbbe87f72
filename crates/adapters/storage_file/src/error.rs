//! Storage-specific error type for the JSON file backend.

use smarthome_domain::error::SmartHomeError;

/// Errors originating from the file storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading, writing, or renaming the state file failed.
    #[error("state file I/O error")]
    Io(#[from] std::io::Error),

    /// The state file does not hold valid JSON.
    #[error("state file is corrupt")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for SmartHomeError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
