//! Axum router assembly.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use smarthome_app::ports::{DeviceStateRepository, HealthProbe};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Health routes are open; device routes require `X-Skill-Token`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<R, H>(state: AppState<R, H>) -> Router
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    let guard = Arc::clone(&state.guard);
    Router::new()
        .merge(crate::api::health_routes::<R, H>())
        .merge(crate::api::device_routes::<R, H>(guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
