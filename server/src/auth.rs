//! Admin-key guard for the write endpoints.
//!
//! The caller sends the configured `ADMIN_API_KEY` in the `x-admin-key`
//! header. With no key configured every admin request is refused.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Reads the admin key from request headers.
pub fn extract_admin_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|key| !key.is_empty())
}

/// `true` only when a key is configured and the presented one matches it.
pub fn admin_key_matches(configured: Option<&str>, presented: Option<&str>) -> bool {
    match (configured, presented) {
        (Some(expected), Some(given)) => constant_time_eq(expected.as_bytes(), given.as_bytes()),
        _ => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Admin-key middleware.
pub async fn require_admin_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let configured = state.config.admin_api_key.as_deref();
    if configured.is_none() {
        warn!(path = %request.uri().path(), "admin request refused, ADMIN_API_KEY not set");
        return Err(ApiError::Unauthorized("Invalid admin key".to_string()));
    }
    if !admin_key_matches(configured, extract_admin_key(&headers)) {
        warn!(path = %request.uri().path(), "invalid admin key");
        return Err(ApiError::Unauthorized("Invalid admin key".to_string()));
    }
    debug!(path = %request.uri().path(), "admin key accepted");
    Ok(next.run(request).await)
}
