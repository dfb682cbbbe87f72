//! Health endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smarthome_app::ports::{DeviceStateRepository, HealthProbe};

use crate::state::AppState;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

/// Possible responses from the health endpoints.
pub enum HealthResponse {
    Ok,
    DatabaseUnavailable,
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok => Json(HealthBody {
                status: "ok",
                error: None,
            })
            .into_response(),
            Self::DatabaseUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthBody {
                    status: "error",
                    error: Some("database connection failed"),
                }),
            )
                .into_response(),
        }
    }
}

/// `GET /health`
pub async fn liveness() -> HealthResponse {
    HealthResponse::Ok
}

/// `GET /health/db`
pub async fn database<R, H>(State(state): State<AppState<R, H>>) -> HealthResponse
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    match state.health_service.check_database().await {
        Ok(()) => HealthResponse::Ok,
        Err(_) => HealthResponse::DatabaseUnavailable,
    }
}
