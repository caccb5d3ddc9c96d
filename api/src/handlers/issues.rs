//! Issue handlers
//!
//! Read-only views over the current snapshot. The snapshot is replaced
//! wholesale by each aggregation run.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::{derive_tags, filter_issues, group_tags, sort_issues, SortOrder};
use crate::domain::entities::{http_date, NormalizedIssue, TagGroup};
use crate::error::AppError;
use crate::AppState;

const FETCH_ISSUES_FAILED: &str = "Failed to fetch issues from KV.";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct IssuesResponse {
    pub issues: Vec<NormalizedIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Query parameters for searching issues
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Comma-separated tag list
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    /// `asc` or `desc`; omitted keeps snapshot order
    #[serde(default)]
    pub order: Option<String>,
}

impl SearchQuery {
    fn selected_tags(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub issues: Vec<NormalizedIssue>,
    pub total: usize,
    pub selected_tags: Vec<String>,
    pub query: String,
    pub order: Option<SortOrder>,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
    pub categories: Vec<TagGroup>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/get-issues
pub async fn get_issues(State(state): State<AppState>) -> Result<Json<IssuesResponse>, AppError> {
    let stored = state
        .snapshots
        .stored_issues()
        .await
        .map_err(AppError::store(FETCH_ISSUES_FAILED))?;

    Ok(Json(match stored {
        Some(issues) => IssuesResponse {
            issues,
            message: None,
        },
        None => IssuesResponse {
            issues: Vec::new(),
            message: Some("No issues found or KV store is empty for this key."),
        },
    }))
}

/// GET /api/issues/search
///
/// Tag and text filtering over the snapshot, optionally sorted by creation time.
pub async fn search_issues(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let order = query
        .order
        .as_deref()
        .map(str::parse::<SortOrder>)
        .transpose()?;
    let selected_tags = query.selected_tags();
    let text = query.q.as_deref().unwrap_or_default().trim().to_string();

    let issues = state
        .snapshots
        .issues()
        .await
        .map_err(AppError::store(FETCH_ISSUES_FAILED))?;

    let mut matched = filter_issues(&issues, &state.categories, &selected_tags, &text);
    if let Some(order) = order {
        sort_issues(&mut matched, order);
    }

    let issues: Vec<NormalizedIssue> = matched.into_iter().cloned().collect();
    tracing::debug!(
        tags = ?selected_tags,
        query = %text,
        matched = issues.len(),
        "Searched issues"
    );

    Ok(Json(SearchResponse {
        total: issues.len(),
        issues,
        selected_tags,
        query: text,
        order,
    }))
}

/// GET /api/tags
///
/// Every tag in the snapshot, flat and grouped by category.
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<TagsResponse>, AppError> {
    let issues = state
        .snapshots
        .issues()
        .await
        .map_err(AppError::store(FETCH_ISSUES_FAILED))?;

    let tags = derive_tags(&issues);
    let categories = group_tags(&state.categories, &tags);

    Ok(Json(TagsResponse { tags, categories }))
}

/// GET /issues.json
///
/// The bare issue array, stamped with the completion time of the last run.
pub async fn issues_json(State(state): State<AppState>) -> Result<Response, AppError> {
    let snapshot = state
        .snapshots
        .read()
        .await
        .map_err(AppError::store(FETCH_ISSUES_FAILED))?;

    let mut response = Json(snapshot.issues).into_response();
    if let Some(at) = snapshot.last_updated {
        if let Ok(value) = http_date(at).parse() {
            response.headers_mut().insert(header::LAST_MODIFIED, value);
        }
    }

    Ok(response)
}
