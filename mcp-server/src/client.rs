//! HTTP client for the Good First Issues API
//!
//! Read-only: the MCP server never triggers aggregation runs.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// HTTP client for communicating with the issues API
#[derive(Clone)]
pub struct GfiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GfiClient {
    /// Create a new client from environment variables
    ///
    /// Optional env vars:
    /// - GFI_API_URL: Base URL of the API (default http://localhost:8080)
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("GFI_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

        Self::new(&base_url)
    }

    /// Create a new client with explicit configuration
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Filter the current snapshot by tags and text
    pub async fn search_issues(
        &self,
        tags: &[String],
        query: Option<&str>,
        order: Option<&str>,
    ) -> Result<SearchResult> {
        self.get_json("/api/issues/search", &search_params(tags, query, order))
            .await
    }

    /// Tag vocabulary of the current snapshot
    pub async fn list_tags(&self) -> Result<TagsResult> {
        self.get_json("/api/tags", &[]).await
    }

    /// Completion time of the last aggregation run, `None` if never run
    pub async fn last_updated(&self) -> Result<Option<String>> {
        let response = self.get("/api/get-last-update", &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = handle_text_response(response).await?;
        let update: LastUpdate =
            serde_json::from_str(&body).context("Unexpected last-update response")?;
        Ok(update.last_updated)
    }

    // --- Internal helpers ---

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Failed to GET {}", path))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self.get(path, params).await?;
        let body = handle_text_response(response).await?;
        serde_json::from_str(&body).with_context(|| format!("Unexpected response from {}", path))
    }
}

fn search_params(
    tags: &[String],
    query: Option<&str>,
    order: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if !tags.is_empty() {
        params.push(("tags", tags.join(",")));
    }
    if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
        params.push(("q", q.to_string()));
    }
    if let Some(order) = order {
        params.push(("order", order.to_string()));
    }
    params
}

async fn handle_text_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    if !status.is_success() {
        anyhow::bail!("API error ({}): {}", status, body);
    }

    Ok(body)
}

// --- Response Types ---

#[derive(Debug, Clone, Deserialize)]
pub struct IssueSummary {
    pub title: String,
    pub url: String,
    pub repository: String,
    pub tags: Vec<String>,
    pub created_at: String,
    #[serde(default)]
    pub stars: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub issues: Vec<IssueSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagGroup {
    pub name: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagsResult {
    pub tags: Vec<String>,
    pub categories: Vec<TagGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LastUpdate {
    last_updated: Option<String>,
}
