//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SmartHomeError`] via `From`. Adapters box their storage errors into
//! [`SmartHomeError::Storage`] so the domain stays free of IO crates.

/// Top-level error returned by services and ports.
#[derive(Debug, thiserror::Error)]
pub enum SmartHomeError {
    /// Input failed a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The requested record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The operation clashes with existing data.
    #[error("conflict")]
    Conflict(#[from] ConflictError),

    /// The storage backend failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid device id: {0}")]
    InvalidDeviceId(String),
}

/// A record looked up by id was missing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Writes that would break a uniqueness constraint of the backend.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConflictError {
    /// The single-state backend already holds a device.
    #[error("a device state already exists")]
    AlreadyExists,

    /// The single-state backend only accepts its own device id.
    #[error("device {requested} is not managed here, only {managed} is")]
    ForeignDevice { requested: String, managed: String },
}
