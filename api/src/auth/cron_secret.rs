//! Aggregation trigger authentication
//!
//! A trigger request is accepted when it carries the scheduler marker header
//! or `Authorization: Bearer <CRON_SECRET>`. With no secret configured, only
//! development mode lets other callers through.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::AppState;

/// Hex SHA-256 digest used to compare secrets
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Extract the bearer token from the Authorization header
fn extract_bearer(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn secret_matches(presented: &str, expected: &str) -> bool {
    hash_secret(presented) == hash_secret(expected)
}

/// Trigger authentication middleware
pub async fn trigger_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let config = &state.config;

    if request.headers().contains_key(config.cron_marker_header.as_str()) {
        tracing::debug!(header = %config.cron_marker_header, "Trigger from scheduler");
        return Ok(next.run(request).await);
    }

    match (&config.cron_secret, extract_bearer(&request)) {
        (Some(secret), Some(token)) if secret_matches(token, secret) => {
            tracing::debug!("Trigger with shared secret");
        }
        (None, _) if config.dev_mode() => {
            tracing::warn!("CRON_SECRET is not set; allowing trigger in development mode");
        }
        _ => {
            tracing::warn!(path = %request.uri().path(), "Rejected unauthenticated trigger");
            return Err(AppError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}
