//! Shared application state for axum handlers.

use std::sync::Arc;

use smarthome_app::auth::SkillTokenGuard;
use smarthome_app::ports::{DeviceStateRepository, HealthProbe};
use smarthome_app::services::device_state_service::DeviceStateService;
use smarthome_app::services::health_service::HealthService;
use smarthome_domain::id::DeviceId;

/// Application state shared across all axum handlers.
///
/// Generic over the repository and health probe types to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<R, H> {
    /// Device state use-cases.
    pub device_state_service: Arc<DeviceStateService<R>>,
    /// Storage liveness check.
    pub health_service: Arc<HealthService<H>>,
    /// Guard applied to every device route.
    pub guard: Arc<SkillTokenGuard>,
    /// Device addressed by `/devices/state` and `/devices/toggle`.
    pub default_device: DeviceId,
}

impl<R, H> Clone for AppState<R, H> {
    fn clone(&self) -> Self {
        Self {
            device_state_service: Arc::clone(&self.device_state_service),
            health_service: Arc::clone(&self.health_service),
            guard: Arc::clone(&self.guard),
            default_device: self.default_device,
        }
    }
}

impl<R, H> AppState<R, H>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        device_state_service: DeviceStateService<R>,
        health_service: HealthService<H>,
        guard: SkillTokenGuard,
        default_device: DeviceId,
    ) -> Self {
        Self {
            device_state_service: Arc::new(device_state_service),
            health_service: Arc::new(health_service),
            guard: Arc::new(guard),
            default_device,
        }
    }
}
