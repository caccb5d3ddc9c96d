//! GitHub client port trait
//!
//! Defines the slice of the GitHub REST API the aggregator needs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GitHubError;

/// GitHub issue representation (the fields we read)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubIssue {
    pub id: i64,
    pub number: i64,
    pub title: String,
    pub html_url: String,
    pub created_at: String,
    /// Present (non-null) only when the "issue" is really a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl GitHubIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// GitHub repository representation (popularity counters only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub full_name: String,
    pub stargazers_count: i64,
    pub forks_count: i64,
}

/// Port trait for GitHub API operations
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// List open issues carrying exactly `label` (first page only)
    async fn list_open_issues(
        &self,
        owner: &str,
        repo: &str,
        label: &str,
    ) -> Result<Vec<GitHubIssue>, GitHubError>;

    /// Fetch repository metadata
    async fn get_repo(&self, owner: &str, repo: &str) -> Result<GitHubRepo, GitHubError>;
}
