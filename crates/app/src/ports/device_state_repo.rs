//! Device state repository port — persistence for [`DeviceState`]s.

use std::future::Future;

use smarthome_domain::device_state::DeviceState;
use smarthome_domain::error::SmartHomeError;
use smarthome_domain::id::DeviceId;
use smarthome_domain::time::Timestamp;

/// Repository for persisting and querying device states.
///
/// Implementations must keep exactly one state per [`DeviceId`].
pub trait DeviceStateRepository {
    /// Insert a brand-new state.
    ///
    /// Fails with a conflict when the backend cannot hold another state.
    fn create(
        &self,
        state: DeviceState,
    ) -> impl Future<Output = Result<DeviceState, SmartHomeError>> + Send;

    /// Get a state by device id.
    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<DeviceState>, SmartHomeError>> + Send;

    /// Get all states, ordered by device id.
    fn get_all(&self) -> impl Future<Output = Result<Vec<DeviceState>, SmartHomeError>> + Send;

    /// Insert the state, or overwrite status and timestamp of an existing one.
    fn upsert(
        &self,
        state: DeviceState,
    ) -> impl Future<Output = Result<DeviceState, SmartHomeError>> + Send;

    /// Atomically negate the status of `id`, stamping it with `at`.
    ///
    /// Returns `None` when no state exists for `id`.
    fn toggle(
        &self,
        id: DeviceId,
        at: Timestamp,
    ) -> impl Future<Output = Result<Option<DeviceState>, SmartHomeError>> + Send;
}
