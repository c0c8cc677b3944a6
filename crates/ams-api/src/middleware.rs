//! Middleware — optional static bearer token on role routes.

use std::sync::Arc;

use ams_common::error::AmsError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Reject requests whose `Authorization: Bearer` token does not match the
/// configured one. A backend without a token accepts everything.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AmsError> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AmsError::Unauthorized)?;

    if token != expected {
        tracing::debug!("rejected request with wrong api token");
        return Err(AmsError::Unauthorized);
    }

    Ok(next.run(request).await)
}
