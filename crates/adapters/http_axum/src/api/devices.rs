//! JSON handlers for device states.

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use smarthome_app::ports::{DeviceStateRepository, HealthProbe};
use smarthome_domain::device_state::{DeviceState, Status};
use smarthome_domain::error::{SmartHomeError, ValidationError};
use smarthome_domain::id::DeviceId;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a device.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    #[serde(default)]
    pub status: bool,
}

/// Request body for setting a device status.
#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<DeviceState>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from endpoints returning a single state.
pub enum StateResponse {
    Ok(Json<DeviceState>),
}

impl IntoResponse for StateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<DeviceState>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<DeviceId, ApiError> {
    DeviceId::from_str(raw).map_err(|_| {
        ApiError::from(SmartHomeError::from(ValidationError::InvalidDeviceId(
            raw.to_string(),
        )))
    })
}

/// `GET /devices`
pub async fn list<R, H>(State(state): State<AppState<R, H>>) -> Result<ListResponse, ApiError>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    let states = state.device_state_service.list().await?;
    Ok(ListResponse::Ok(Json(states)))
}

/// `POST /devices`
pub async fn create<R, H>(
    State(state): State<AppState<R, H>>,
    body: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    let Json(req) = body?;
    let created = state
        .device_state_service
        .create(Status::from(req.status))
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `GET /devices/:id`
pub async fn get<R, H>(
    State(state): State<AppState<R, H>>,
    Path(id): Path<String>,
) -> Result<StateResponse, ApiError>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    let device = state.device_state_service.get(parse_id(&id)?).await?;
    Ok(StateResponse::Ok(Json(device)))
}

/// `POST /devices/:id`
pub async fn set<R, H>(
    State(state): State<AppState<R, H>>,
    Path(id): Path<String>,
    body: Result<Json<SetStatusRequest>, JsonRejection>,
) -> Result<StateResponse, ApiError>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let Json(req) = body?;
    let device = state
        .device_state_service
        .set(id, Status::from(req.status))
        .await?;
    Ok(StateResponse::Ok(Json(device)))
}

/// `POST /devices/:id/toggle`
pub async fn toggle<R, H>(
    State(state): State<AppState<R, H>>,
    Path(id): Path<String>,
) -> Result<StateResponse, ApiError>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    let device = state.device_state_service.toggle(parse_id(&id)?).await?;
    Ok(StateResponse::Ok(Json(device)))
}

/// `GET /devices/state`
pub async fn get_default<R, H>(
    State(state): State<AppState<R, H>>,
) -> Result<StateResponse, ApiError>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    let device = state
        .device_state_service
        .get(state.default_device)
        .await?;
    Ok(StateResponse::Ok(Json(device)))
}

/// `POST /devices/state`
pub async fn set_default<R, H>(
    State(state): State<AppState<R, H>>,
    body: Result<Json<SetStatusRequest>, JsonRejection>,
) -> Result<StateResponse, ApiError>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    let Json(req) = body?;
    let device = state
        .device_state_service
        .set(state.default_device, Status::from(req.status))
        .await?;
    Ok(StateResponse::Ok(Json(device)))
}

/// `POST /devices/toggle`
pub async fn toggle_default<R, H>(
    State(state): State<AppState<R, H>>,
) -> Result<StateResponse, ApiError>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
{
    let device = state
        .device_state_service
        .toggle(state.default_device)
        .await?;
    Ok(StateResponse::Ok(Json(device)))
}
