//! Unified error types for the issues API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors
//! - `GitHubError`: GitHub API client errors
//! - `StoreError`: Key-value store errors
//! - `AppError`: Application layer errors (HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// GitHub API client errors
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}")]
    Api { status: u16, message: String },

    #[error("Rate limited (HTTP {status})")]
    RateLimited { status: u16 },

    #[error("Unauthorized - invalid token")]
    Unauthorized,

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Key-value store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt value under '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: StoreError,
    },

    #[error("Unauthorized")]
    Unauthorized,
}

impl AppError {
    /// Wrap a store error with the message shown to clients
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { context, source }
    }
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error".to_string(),
                Some(msg.clone()),
            ),
            AppError::Store { context, source } => {
                tracing::error!(error = %source, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    context.to_string(),
                    Some(source.to_string()),
                )
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None),
        };

        let body = Json(ErrorResponse { error, details });

        (status, body).into_response()
    }
}
