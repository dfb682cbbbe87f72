//! # smarthome-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceStateRepository` — read, create, upsert, toggle, list device states
//!   - `SchemaSeeder` — idempotent schema bootstrap and destructive reset
//!   - `HealthProbe` — backend liveness check
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DeviceStateService`, `SeedService`, `HealthService`
//! - Provide the stateless `SkillTokenGuard` predicate
//!
//! ## Dependency rule
//! Depends on `smarthome-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod auth;
pub mod ports;
pub mod services;
