//! Device state service — use-cases for reading and switching devices.

use smarthome_domain::device_state::{DeviceState, Status};
use smarthome_domain::error::{NotFoundError, SmartHomeError};
use smarthome_domain::id::DeviceId;
use smarthome_domain::time::now;

use crate::ports::DeviceStateRepository;

/// Application service for device state operations.
pub struct DeviceStateService<R> {
    repo: R,
}

impl<R: DeviceStateRepository> DeviceStateService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a new device with a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Conflict`] if the backend cannot hold another
    /// device, or a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, initial_status: Status) -> Result<DeviceState, SmartHomeError> {
        let state = DeviceState::new(DeviceId::new(), initial_status);
        let created = self.repo.create(state).await?;
        tracing::info!(device_id = %created.id, status = %created.status, "device created");
        Ok(created)
    }

    /// Look up the state of a device, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when no state exists for `id`,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: DeviceId) -> Result<DeviceState, SmartHomeError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// List the state of every device.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<DeviceState>, SmartHomeError> {
        self.repo.get_all().await
    }

    /// Set the status of a device, creating its state when missing.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Conflict`] if the backend refuses the id,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn set(&self, id: DeviceId, status: Status) -> Result<DeviceState, SmartHomeError> {
        let saved = self.repo.upsert(DeviceState::new(id, status)).await?;
        tracing::debug!(device_id = %id, status = %saved.status, "device status set");
        Ok(saved)
    }

    /// Flip the status of an existing device.
    ///
    /// The repository performs the flip as a single atomic write, so two
    /// concurrent toggles always yield two transitions.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when no state exists for `id`,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn toggle(&self, id: DeviceId) -> Result<DeviceState, SmartHomeError> {
        let toggled = self
            .repo
            .toggle(id, now())
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::debug!(device_id = %id, status = %toggled.status, "device toggled");
        Ok(toggled)
    }
}

fn not_found(id: DeviceId) -> SmartHomeError {
    NotFoundError {
        entity: "DeviceState",
        id: id.to_string(),
    }
    .into()
}
