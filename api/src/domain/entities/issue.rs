//! Issue domain entity
//!
//! Issues live on GitHub (source of truth). A `NormalizedIssue` is the
//! source-agnostic record the aggregator persists and the read path serves.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Identity of an issue across the whole snapshot.
///
/// The upstream `id` is only unique within one repository, so records are
/// keyed by repository + issue number instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueKey {
    pub repository: String,
    pub number: i64,
}

impl IssueKey {
    pub fn new(repository: impl Into<String>, number: i64) -> Self {
        Self {
            repository: repository.into(),
            number,
        }
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.repository, self.number)
    }
}

/// A "good first issue" after tagging and pull-request exclusion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIssue {
    /// Upstream-assigned id (not globally unique)
    pub id: i64,
    pub title: String,
    pub url: String,
    /// `owner/repo`
    pub repository: String,
    /// Inherited verbatim from the repository source
    pub tags: Vec<String>,
    /// ISO-8601 timestamp as reported upstream
    pub created_at: String,
    pub number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forks: Option<i64>,
}

impl NormalizedIssue {
    pub fn key(&self) -> IssueKey {
        IssueKey::new(self.repository.clone(), self.number)
    }

    /// `created_at` as an instant, if it parses as RFC 3339
    pub fn created_instant(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created_at).ok()
    }

    pub fn has_any_tag<'a, I>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        candidates
            .into_iter()
            .any(|candidate| self.tags.iter().any(|t| t == candidate))
    }
}
