//! Health port — backend liveness.

use std::future::Future;

use smarthome_domain::error::SmartHomeError;

/// Cheap round-trip to the storage backend.
pub trait HealthProbe {
    fn ping(&self) -> impl Future<Output = Result<(), SmartHomeError>> + Send;
}
