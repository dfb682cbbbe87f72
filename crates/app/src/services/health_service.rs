//! Health service — keeps health-check logic out of the HTTP handlers.

use smarthome_domain::error::SmartHomeError;

use crate::ports::HealthProbe;

pub struct HealthService<H> {
    probe: H,
}

impl<H: HealthProbe> HealthService<H> {
    pub fn new(probe: H) -> Self {
        Self { probe }
    }

    /// Round-trip to the storage backend.
    ///
    /// # Errors
    ///
    /// Returns the storage error reported by the probe.
    pub async fn check_database(&self) -> Result<(), SmartHomeError> {
        self.probe.ping().await.inspect_err(|err| {
            tracing::warn!(error = %err, "storage health check failed");
        })
    }
}
