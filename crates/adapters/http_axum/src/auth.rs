//! `X-Skill-Token` middleware.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use smarthome_app::auth::SkillTokenGuard;

use crate::error::ApiError;

/// Header carrying the shared secret.
pub const SKILL_TOKEN_HEADER: &str = "x-skill-token";

/// Reject the request unless it carries the configured skill token.
///
/// A header that is not valid visible ASCII counts as missing.
pub async fn require_skill_token(
    State(guard): State<Arc<SkillTokenGuard>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(SKILL_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    guard.verify(presented).inspect_err(|err| {
        tracing::debug!(error = %err, path = %request.uri().path(), "skill token rejected");
    })?;

    Ok(next.run(request).await)
}
