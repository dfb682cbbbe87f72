//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
pub mod health;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use smarthome_app::auth::SkillTokenGuard;
use smarthome_app::ports::{DeviceStateRepository, HealthProbe};

use crate::auth::require_skill_token;
use crate::state::AppState;

/// Build the unauthenticated health sub-router.
pub fn health_routes<R, H>() -> Router<AppState<R, H>>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/db", get(health::database::<R, H>))
}

/// Build the `/devices` sub-router, every route guarded by `guard`.
pub fn device_routes<R, H>(guard: Arc<SkillTokenGuard>) -> Router<AppState<R, H>>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/devices",
            get(devices::list::<R, H>).post(devices::create::<R, H>),
        )
        // Default device
        .route(
            "/devices/state",
            get(devices::get_default::<R, H>).post(devices::set_default::<R, H>),
        )
        .route("/devices/toggle", post(devices::toggle_default::<R, H>))
        // Addressed by id
        .route(
            "/devices/{id}",
            get(devices::get::<R, H>).post(devices::set::<R, H>),
        )
        .route("/devices/{id}/toggle", post(devices::toggle::<R, H>))
        .route_layer(middleware::from_fn_with_state(guard, require_skill_token))
}
