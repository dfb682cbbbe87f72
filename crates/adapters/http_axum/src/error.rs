//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smarthome_app::auth::AuthError;
use smarthome_domain::error::SmartHomeError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Every failure a handler or middleware can surface.
pub enum ApiError {
    /// Failure reported by an application service.
    Domain(SmartHomeError),
    /// The skill-token guard refused the request.
    Auth(AuthError),
    /// The request body was not the expected JSON.
    Body(JsonRejection),
}

impl From<SmartHomeError> for ApiError {
    fn from(err: SmartHomeError) -> Self {
        Self::Domain(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::Body(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Domain(SmartHomeError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(SmartHomeError::Conflict(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(SmartHomeError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(SmartHomeError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Self::Auth(err @ AuthError::NotConfigured) => {
                tracing::error!("rejecting device request: skill token is not configured");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            Self::Auth(err @ AuthError::InvalidToken) => {
                (StatusCode::UNAUTHORIZED, err.to_string())
            }
            Self::Body(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text()),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
