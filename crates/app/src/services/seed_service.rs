//! Seed service — schema bootstrap and optional reset.

use smarthome_domain::error::SmartHomeError;

use crate::ports::{SchemaSeeder, SeedOptions, SeedReport};

/// Public interface for triggering seeding routines.
pub struct SeedService<S> {
    seeder: S,
    options: SeedOptions,
}

impl<S: SchemaSeeder> SeedService<S> {
    pub fn new(seeder: S, options: SeedOptions) -> Self {
        Self { seeder, options }
    }

    /// Seed the schema, dropping every managed table first when `reset` is set.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the seeder.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, reset: bool) -> Result<SeedReport, SmartHomeError> {
        if reset {
            tracing::warn!("dropping all managed tables before seeding");
            self.seeder.reset().await?;
        }
        let report = self.seeder.seed(self.options).await?;
        tracing::info!(
            tables = report.tables.len(),
            inserted = report.inserted,
            "schema seeded"
        );
        Ok(report)
    }
}
