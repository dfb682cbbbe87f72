//! # smarthome-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `DeviceStateRepository`, `SchemaSeeder`, and `HealthProbe`
//!   ports defined in `smarthome-app`
//! - Manage `SQLite` connection pool lifecycle
//! - Create the schema idempotently (guarded DDL, conflict-ignoring DML)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `smarthome-app` (for port traits) and `smarthome-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod device_state_repo;
mod error;
mod health;
mod pool;
mod seeder;

pub use device_state_repo::SqliteDeviceStateRepository;
pub use error::StorageError;
pub use health::SqliteHealthProbe;
pub use pool::{Config, Database};
pub use seeder::SqliteSeeder;
