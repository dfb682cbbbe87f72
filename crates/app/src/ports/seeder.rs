//! Seeder port — idempotent schema bootstrap.

use std::future::Future;

use smarthome_domain::error::SmartHomeError;
use smarthome_domain::id::DeviceId;

/// What the seeder should create besides the schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedOptions {
    /// Device inserted switched off when missing.
    pub default_device: Option<DeviceId>,
}

/// Summary of a seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub status: &'static str,
    /// Managed tables (or files) that exist after the run.
    pub tables: Vec<String>,
    /// Rows written by this run; zero on a re-run.
    pub inserted: u64,
}

impl SeedReport {
    #[must_use]
    pub fn seeded(tables: Vec<String>, inserted: u64) -> Self {
        Self {
            status: "seeded",
            tables,
            inserted,
        }
    }
}

/// Creates and destroys the storage schema.
///
/// `seed` must be safe to run any number of times; `reset` is destructive.
pub trait SchemaSeeder {
    /// Create every managed table and default row that is missing.
    fn seed(
        &self,
        options: SeedOptions,
    ) -> impl Future<Output = Result<SeedReport, SmartHomeError>> + Send;

    /// Drop every managed table unconditionally.
    fn reset(&self) -> impl Future<Output = Result<(), SmartHomeError>> + Send;
}
