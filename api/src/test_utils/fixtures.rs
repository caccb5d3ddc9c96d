//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use crate::domain::entities::{NormalizedIssue, RepositorySource};
use crate::domain::ports::GitHubIssue;

/// Create a normalized issue with a fixed creation time
pub fn test_issue(id: i64, repository: &str, number: i64, tags: &[&str]) -> NormalizedIssue {
    NormalizedIssue {
        id,
        title: format!("Issue {}", number),
        url: format!("https://github.com/{}/issues/{}", repository, number),
        repository: repository.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        number,
        stars: None,
        forks: None,
    }
}

/// Create a normalized issue with a specific `created_at`
pub fn test_issue_created(number: i64, created_at: &str) -> NormalizedIssue {
    NormalizedIssue {
        created_at: created_at.to_string(),
        ..test_issue(number, "x/y", number, &["rust"])
    }
}

/// Create a registry source using the conventional lowercase label
pub fn test_source(owner: &str, repo: &str, tags: &[&str]) -> RepositorySource {
    RepositorySource::new(owner, repo, "good first issue", tags)
}

/// Create an upstream issue as GitHub returns it
pub fn github_issue(id: i64, number: i64, title: &str) -> GitHubIssue {
    GitHubIssue {
        id,
        number,
        title: title.to_string(),
        html_url: format!("https://github.com/example/repo/issues/{}", number),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        pull_request: None,
    }
}

/// Create an upstream pull request (GitHub lists them alongside issues)
pub fn github_pull_request(id: i64, number: i64, title: &str) -> GitHubIssue {
    GitHubIssue {
        html_url: format!("https://github.com/example/repo/pull/{}", number),
        pull_request: Some(serde_json::json!({
            "url": format!("https://api.github.com/repos/example/repo/pulls/{}", number)
        })),
        ..github_issue(id, number, title)
    }
}
