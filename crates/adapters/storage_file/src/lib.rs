//! # smarthome-adapter-storage-file
//!
//! Single-file persistence adapter.
//!
//! ## Responsibilities
//! - Keep exactly one device state in a JSON file (`STATE_FILE_PATH`)
//! - Implement the `DeviceStateRepository`, `SchemaSeeder`, and `HealthProbe`
//!   ports defined in `smarthome-app`
//! - Serialize every read-modify-write through one async mutex and replace the
//!   file atomically (write to a sibling, then rename)
//!
//! ## Dependency rule
//! Depends on `smarthome-app` (for port traits) and `smarthome-domain` (for domain types).

mod error;
mod store;

pub use error::StorageError;
pub use store::JsonFileStore;
