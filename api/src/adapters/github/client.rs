//! GitHub API client implementation

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use urlencoding::encode;

use crate::domain::ports::{GitHubClient, GitHubIssue, GitHubRepo};
use crate::error::GitHubError;

/// GitHub rejects requests without a user agent
const USER_AGENT: &str = concat!("gfi-aggregator/", env!("CARGO_PKG_VERSION"));

/// Implementation of the GitHub API client
pub struct GitHubClientImpl {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClientImpl {
    pub fn new(base_url: String, token: Option<String>) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn issues_url(&self, owner: &str, repo: &str, label: &str) -> String {
        self.api_url(&format!(
            "/repos/{}/{}/issues?state=open&labels={}",
            owner,
            repo,
            encode(label)
        ))
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, GitHubError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| GitHubError::Deserialization(e.to_string()))
        } else {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let message = response.text().await.unwrap_or_default();
            Err(classify(status.as_u16(), remaining.as_deref(), message))
        }
    }
}

/// Map a non-success status to an error. GitHub signals primary rate limit
/// exhaustion with 403 and a zero quota.
fn classify(status: u16, remaining: Option<&str>, message: String) -> GitHubError {
    match (status, remaining) {
        (401, _) => GitHubError::Unauthorized,
        (429, _) | (403, Some("0")) => GitHubError::RateLimited { status },
        _ => GitHubError::Api { status, message },
    }
}

#[async_trait]
impl GitHubClient for GitHubClientImpl {
    async fn list_open_issues(
        &self,
        owner: &str,
        repo: &str,
        label: &str,
    ) -> Result<Vec<GitHubIssue>, GitHubError> {
        let response = self
            .get(&self.issues_url(owner, repo, label))
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn get_repo(&self, owner: &str, repo: &str) -> Result<GitHubRepo, GitHubError> {
        let response = self
            .get(&self.api_url(&format!("/repos/{}/{}", owner, repo)))
            .send()
            .await?;

        self.handle_response(response).await
    }
}
