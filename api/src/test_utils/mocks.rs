//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They record the calls they receive so tests can verify behavior.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::ports::{GitHubClient, GitHubIssue, GitHubRepo, KeyValueStore};
use crate::error::{GitHubError, StoreError};

// ============================================================================
// Mock GitHub Client
// ============================================================================

type RepoKey = (String, String);
type IssueRequest = (String, String, String);

/// Repositories without configured issues return an empty list; repositories
/// without configured stats fail `get_repo` with a 404.
#[derive(Default)]
pub struct MockGitHubClient {
    issues: Arc<RwLock<HashMap<RepoKey, Vec<GitHubIssue>>>>,
    labelled_issues: Arc<RwLock<HashMap<IssueRequest, Vec<GitHubIssue>>>>,
    statuses: Arc<RwLock<HashMap<RepoKey, u16>>>,
    stats: Arc<RwLock<HashMap<RepoKey, (i64, i64)>>>,
    issue_requests: Arc<RwLock<Vec<IssueRequest>>>,
    repo_requests: Arc<RwLock<Vec<String>>>,
}

impl MockGitHubClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the issues listed for a repository
    pub fn with_issues(self, owner: &str, repo: &str, issues: Vec<GitHubIssue>) -> Self {
        self.issues
            .write()
            .unwrap()
            .insert((owner.to_string(), repo.to_string()), issues);
        self
    }

    /// Configure the issues listed for one label of a repository; takes
    /// precedence over `with_issues`
    pub fn with_label_issues(
        self,
        owner: &str,
        repo: &str,
        label: &str,
        issues: Vec<GitHubIssue>,
    ) -> Self {
        self.labelled_issues.write().unwrap().insert(
            (owner.to_string(), repo.to_string(), label.to_string()),
            issues,
        );
        self
    }

    /// Make every request for a repository fail with an HTTP status
    pub fn with_status(self, owner: &str, repo: &str, status: u16) -> Self {
        self.statuses
            .write()
            .unwrap()
            .insert((owner.to_string(), repo.to_string()), status);
        self
    }

    /// Configure star and fork counts for a repository
    pub fn with_repo_stats(self, owner: &str, repo: &str, stars: i64, forks: i64) -> Self {
        self.stats
            .write()
            .unwrap()
            .insert((owner.to_string(), repo.to_string()), (stars, forks));
        self
    }

    /// `(owner, repo, label)` of every issue listing, in call order
    pub fn issue_requests(&self) -> Vec<IssueRequest> {
        self.issue_requests.read().unwrap().clone()
    }

    /// `owner/repo` of every repository lookup, in call order
    pub fn repo_requests(&self) -> Vec<String> {
        self.repo_requests.read().unwrap().clone()
    }

    fn failure(&self, owner: &str, repo: &str) -> Option<GitHubError> {
        let statuses = self.statuses.read().unwrap();
        statuses
            .get(&(owner.to_string(), repo.to_string()))
            .map(|&status| match status {
                429 => GitHubError::RateLimited { status },
                _ => GitHubError::Api {
                    status,
                    message: "Mock failure".to_string(),
                },
            })
    }
}

#[async_trait]
impl GitHubClient for MockGitHubClient {
    async fn list_open_issues(
        &self,
        owner: &str,
        repo: &str,
        label: &str,
    ) -> Result<Vec<GitHubIssue>, GitHubError> {
        self.issue_requests.write().unwrap().push((
            owner.to_string(),
            repo.to_string(),
            label.to_string(),
        ));

        if let Some(error) = self.failure(owner, repo) {
            return Err(error);
        }

        let labelled = self.labelled_issues.read().unwrap();
        if let Some(issues) =
            labelled.get(&(owner.to_string(), repo.to_string(), label.to_string()))
        {
            return Ok(issues.clone());
        }

        let issues = self.issues.read().unwrap();
        Ok(issues
            .get(&(owner.to_string(), repo.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_repo(&self, owner: &str, repo: &str) -> Result<GitHubRepo, GitHubError> {
        self.repo_requests
            .write()
            .unwrap()
            .push(format!("{}/{}", owner, repo));

        if let Some(error) = self.failure(owner, repo) {
            return Err(error);
        }

        let stats = self.stats.read().unwrap();
        match stats.get(&(owner.to_string(), repo.to_string())) {
            Some(&(stars, forks)) => Ok(GitHubRepo {
                full_name: format!("{}/{}", owner, repo),
                stargazers_count: stars,
                forks_count: forks,
            }),
            None => Err(GitHubError::Api {
                status: 404,
                message: "Not Found".to_string(),
            }),
        }
    }
}

// ============================================================================
// Failing Key-Value Store
// ============================================================================

/// Store whose every call fails
pub struct FailingKvStore;

#[async_trait]
impl KeyValueStore for FailingKvStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Backend("Mock store unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Backend("Mock store unavailable".to_string()))
    }
}
