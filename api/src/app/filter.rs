//! Issue filter engine
//!
//! Pure functions over an in-memory issue list:
//! - tag filtering: AND across categories, OR within a category
//! - text filtering: case-insensitive substring of title or repository
//! - stable sort by creation time
//! - tag vocabulary derivation and grouping
//!
//! Nothing here touches the network or the store, so it is safe to re-run on
//! every request.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{CategoryMap, NormalizedIssue, TagGroup};
use crate::error::DomainError;

/// Sort direction for `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "oldest" => Ok(SortOrder::Asc),
            "desc" | "newest" => Ok(SortOrder::Desc),
            _ => Err(DomainError::Validation(format!("Unknown sort order: {}", s))),
        }
    }
}

/// Keep issues matching every non-empty category bucket of `selected`
pub fn filter_by_tags<'a>(
    issues: &'a [NormalizedIssue],
    categories: &CategoryMap,
    selected: &[String],
) -> Vec<&'a NormalizedIssue> {
    let buckets = categories.partition(selected.iter().map(String::as_str));

    issues
        .iter()
        .filter(|issue| buckets.iter().all(|bucket| issue.has_any_tag(&bucket.tags)))
        .collect()
}

/// Keep issues whose title or repository contains `query`, ignoring case
pub fn filter_by_text<'a>(issues: Vec<&'a NormalizedIssue>, query: &str) -> Vec<&'a NormalizedIssue> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return issues;
    }

    issues
        .into_iter()
        .filter(|issue| {
            issue.title.to_lowercase().contains(&needle)
                || issue.repository.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Tag filter followed by text filter
pub fn filter_issues<'a>(
    issues: &'a [NormalizedIssue],
    categories: &CategoryMap,
    selected: &[String],
    query: &str,
) -> Vec<&'a NormalizedIssue> {
    filter_by_text(filter_by_tags(issues, categories, selected), query)
}

/// Stable sort by `created_at`.
///
/// Timestamps that do not parse order before every valid one when ascending.
pub fn sort_issues(issues: &mut [&NormalizedIssue], order: SortOrder) {
    issues.sort_by(|a, b| {
        let ordering = compare_created(a, b);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_created(a: &NormalizedIssue, b: &NormalizedIssue) -> Ordering {
    a.created_instant().cmp(&b.created_instant())
}

/// Distinct tags across all issues, sorted
pub fn derive_tags(issues: &[NormalizedIssue]) -> Vec<String> {
    issues
        .iter()
        .flat_map(|issue| issue.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The tag vocabulary grouped by category, "Other" last
pub fn group_tags(categories: &CategoryMap, tags: &[String]) -> Vec<TagGroup> {
    categories.partition(tags.iter().map(String::as_str))
}
