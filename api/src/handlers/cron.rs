//! Aggregation trigger handlers
//!
//! Both routes run a full aggregation inline and answer once the snapshot
//! has been written. Authentication happens in middleware.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::domain::entities::format_timestamp;
use crate::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: String,
    pub issue_count: usize,
    pub logs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TriggerFailure {
    pub success: bool,
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/cron/update-issues
pub async fn update_issues(State(state): State<AppState>) -> impl IntoResponse {
    run_aggregation(&state, "Issues updated successfully").await
}

/// GET /api/test-cron
///
/// Manual trigger for local runs; same behavior as the scheduled one.
pub async fn test_cron(State(state): State<AppState>) -> impl IntoResponse {
    run_aggregation(&state, "Cron job test executed successfully").await
}

async fn run_aggregation(
    state: &AppState,
    message: &'static str,
) -> Result<Json<TriggerResponse>, (StatusCode, Json<TriggerFailure>)> {
    tracing::info!("Starting issues update");

    match state.aggregator.run().await {
        Ok(report) => {
            tracing::info!(issues = report.issues.len(), "Issues update completed");
            Ok(Json(TriggerResponse {
                success: true,
                message,
                timestamp: format_timestamp(report.timestamp),
                issue_count: report.issues.len(),
                logs: report.logs,
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Issues update failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TriggerFailure {
                    success: false,
                    error: e.to_string(),
                }),
            ))
        }
    }
}
