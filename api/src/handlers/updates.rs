//! Last-update handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use crate::domain::entities::format_timestamp;
use crate::AppState;

/// GET /api/get-last-update
pub async fn get_last_update(State(state): State<AppState>) -> impl IntoResponse {
    match state.snapshots.last_updated().await {
        Ok(Some(at)) => (
            StatusCode::OK,
            Json(json!({ "lastUpdated": format_timestamp(at) })),
        ),
        Ok(None) => (StatusCode::NOT_FOUND, Json(json!({ "lastUpdated": null }))),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching last update time from KV");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch last update time" })),
            )
        }
    }
}

/// GET /api/verify-timestamp
///
/// Reports how long ago the last aggregation finished.
pub async fn verify_timestamp(State(state): State<AppState>) -> impl IntoResponse {
    match state.snapshots.last_updated().await {
        Ok(Some(at)) => {
            let seconds_ago = (Utc::now() - at).num_seconds();
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "timestamp": format_timestamp(at),
                    "formattedTimestamp": at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                    "secondsAgo": seconds_ago,
                    "message": format!(
                        "Timestamp successfully retrieved! The cron job last ran {} seconds ago.",
                        seconds_ago
                    ),
                })),
            )
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "message": "No timestamp found. Please run the test-cron endpoint first.",
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Error retrieving timestamp from KV");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
        }
    }
}
