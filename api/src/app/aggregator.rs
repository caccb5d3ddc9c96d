//! Aggregator service
//!
//! Polls every registry source for open "good first issue" tickets, one
//! request at a time, normalizes the results and overwrites the snapshot.
//! A failing source is logged and skipped; only a failing store write aborts
//! the run.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use super::aggregation_config::{DEFAULT_ENRICH_REPO_STATS, DEFAULT_FETCH_DELAY_MS};
use crate::domain::entities::{
    format_timestamp, NormalizedIssue, Registry, RepositorySource, ISSUES_KEY, LAST_UPDATE_KEY,
};
use crate::domain::ports::{GitHubClient, GitHubIssue, KeyValueStore};
use crate::error::{GitHubError, StoreError};

/// Tunables for one aggregator
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    /// Fixed pause between two sources, whatever the outcome
    pub fetch_delay: Duration,
    /// Fetch star/fork counts for every repository that yielded issues
    pub enrich: bool,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            fetch_delay: Duration::from_millis(DEFAULT_FETCH_DELAY_MS),
            enrich: DEFAULT_ENRICH_REPO_STATS,
        }
    }
}

/// Outcome of one successful run
#[derive(Debug, Clone, Serialize)]
pub struct AggregationReport {
    pub issues: Vec<NormalizedIssue>,
    pub logs: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Map one upstream issue to the persisted record
pub fn normalize(source: &RepositorySource, issue: GitHubIssue) -> NormalizedIssue {
    NormalizedIssue {
        id: issue.id,
        title: issue.title,
        url: issue.html_url,
        repository: source.full_name(),
        tags: source.tags.clone(),
        created_at: issue.created_at,
        number: issue.number,
        stars: None,
        forks: None,
    }
}

pub struct AggregatorService<GC: ?Sized, KV: ?Sized> {
    github: Arc<GC>,
    store: Arc<KV>,
    registry: Registry,
    options: AggregatorOptions,
}

impl<GC, KV> AggregatorService<GC, KV>
where
    GC: GitHubClient + ?Sized,
    KV: KeyValueStore + ?Sized,
{
    pub fn new(
        github: Arc<GC>,
        store: Arc<KV>,
        registry: Registry,
        options: AggregatorOptions,
    ) -> Self {
        Self {
            github,
            store,
            registry,
            options,
        }
    }

    /// Run one full aggregation and overwrite the snapshot
    pub async fn run(&self) -> Result<AggregationReport, StoreError> {
        let span = tracing::info_span!("aggregation", run_id = %Uuid::new_v4());
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<AggregationReport, StoreError> {
        let mut logs = Vec::new();
        let sources = self.registry.sources();

        tracing::info!(sources = sources.len(), "Starting issues fetch");
        logs.push(format!(
            "Fetching issues from {} repositories...",
            sources.len()
        ));

        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut contributing: Vec<&RepositorySource> = Vec::new();
        let mut contributing_names = HashSet::new();

        for (index, source) in sources.iter().enumerate() {
            let full_name = source.full_name();
            logs.push(format!(
                "Fetching issues for {} with label '{}'...",
                full_name, source.label
            ));

            match self.fetch_source(source).await {
                Ok((found, normalized)) => {
                    tracing::debug!(
                        repository = %full_name,
                        found,
                        kept = normalized.len(),
                        "Fetched issues"
                    );
                    logs.push(format!("Found {} issues for {}.", found, full_name));

                    let before = issues.len();
                    for issue in normalized {
                        if seen.insert(issue.key()) {
                            issues.push(issue);
                        } else {
                            tracing::debug!(issue = %issue.key(), "Skipping duplicate issue");
                        }
                    }
                    // One stats lookup per repository, whatever its label count
                    if issues.len() > before && contributing_names.insert(full_name.clone()) {
                        contributing.push(source);
                    }
                }
                Err(e) => {
                    if matches!(e, GitHubError::RateLimited { .. }) {
                        tracing::warn!(repository = %full_name, error = %e, "Rate limited by GitHub");
                    } else {
                        tracing::warn!(repository = %full_name, error = %e, "Failed to fetch issues");
                    }
                    logs.push(format!("Error fetching issues for {}: {}", full_name, e));
                }
            }

            if index + 1 < sources.len() && !self.options.fetch_delay.is_zero() {
                tokio::time::sleep(self.options.fetch_delay).await;
            }
        }

        logs.push(format!("Total issues fetched: {}", issues.len()));

        if self.options.enrich && !contributing.is_empty() {
            self.enrich(&contributing, &mut issues).await;
        }

        let timestamp = Utc::now();
        if let Err(e) = self.persist(&issues, timestamp).await {
            tracing::error!(error = %e, "Error saving issues to the key-value store");
            logs.push(format!(
                "Error saving issues to the key-value store: {}",
                e
            ));
            return Err(e);
        }

        tracing::info!(issues = issues.len(), "Saved issues to the key-value store");
        logs.push(format!(
            "Successfully saved {} issues to the key-value store.",
            issues.len()
        ));

        Ok(AggregationReport {
            issues,
            logs,
            timestamp,
        })
    }

    /// Returns the raw upstream count alongside the kept issues
    async fn fetch_source(
        &self,
        source: &RepositorySource,
    ) -> Result<(usize, Vec<NormalizedIssue>), GitHubError> {
        let upstream = self
            .github
            .list_open_issues(&source.owner, &source.repo, &source.label)
            .await?;

        let found = upstream.len();
        let kept = upstream
            .into_iter()
            .filter(|issue| !issue.is_pull_request())
            .map(|issue| normalize(source, issue))
            .collect();

        Ok((found, kept))
    }

    /// Attach star/fork counts, one concurrent lookup per repository
    async fn enrich(&self, sources: &[&RepositorySource], issues: &mut [NormalizedIssue]) {
        let lookups = sources.iter().map(|source| async move {
            let result = self.github.get_repo(&source.owner, &source.repo).await;
            (source.full_name(), result)
        });

        let mut counts = HashMap::new();
        for (full_name, result) in join_all(lookups).await {
            match result {
                Ok(repo) => {
                    tracing::debug!(
                        repository = %repo.full_name,
                        stars = repo.stargazers_count,
                        forks = repo.forks_count,
                        "Fetched repository stats"
                    );
                    counts.insert(full_name, (repo.stargazers_count, repo.forks_count));
                }
                Err(e) => {
                    tracing::debug!(repository = %full_name, error = %e, "No repository stats");
                }
            }
        }

        for issue in issues.iter_mut() {
            if let Some(&(stars, forks)) = counts.get(&issue.repository) {
                issue.stars = Some(stars);
                issue.forks = Some(forks);
            }
        }
    }

    async fn persist(
        &self,
        issues: &[NormalizedIssue],
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.store
            .set(ISSUES_KEY, serde_json::to_value(issues)?)
            .await?;
        self.store
            .set(
                LAST_UPDATE_KEY,
                serde_json::Value::String(format_timestamp(timestamp)),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryKvStore;
    use crate::app::SnapshotReader;
    use crate::test_utils::{
        github_issue, github_pull_request, test_source, FailingKvStore, MockGitHubClient,
    };

    fn options() -> AggregatorOptions {
        AggregatorOptions {
            fetch_delay: Duration::ZERO,
            enrich: false,
        }
    }

    fn create_service<KV: KeyValueStore>(
        github: MockGitHubClient,
        store: Arc<KV>,
        sources: Vec<RepositorySource>,
        options: AggregatorOptions,
    ) -> AggregatorService<MockGitHubClient, KV> {
        AggregatorService::new(Arc::new(github), store, Registry::new(sources), options)
    }

    // =========================================================================
    // run tests
    // =========================================================================

    #[tokio::test]
    async fn failing_source_is_skipped_and_logged() {
        let github = MockGitHubClient::new()
            .with_issues(
                "a",
                "one",
                vec![
                    github_issue(1, 1, "First"),
                    github_issue(2, 2, "Second"),
                    github_issue(3, 3, "Third"),
                ],
            )
            .with_status("b", "two", 404);
        let store = Arc::new(MemoryKvStore::new());
        let service = create_service(
            github,
            store.clone(),
            vec![
                test_source("a", "one", &["ethereum", "rust"]),
                test_source("b", "two", &["solana"]),
            ],
            options(),
        );

        let report = service.run().await.unwrap();

        assert_eq!(report.issues.len(), 3);
        assert!(report
            .issues
            .iter()
            .all(|i| i.tags == vec!["ethereum", "rust"] && i.repository == "a/one"));

        let errors: Vec<&String> = report
            .logs
            .iter()
            .filter(|l| l.starts_with("Error fetching issues"))
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("b/two"));
        assert!(errors[0].contains("404"));

        let snapshot = SnapshotReader::new(store).read().await.unwrap();
        assert_eq!(snapshot.issues, report.issues);
        assert!(snapshot.last_updated.is_some());
    }

    #[tokio::test]
    async fn pull_requests_are_dropped() {
        let github = MockGitHubClient::new().with_issues(
            "a",
            "one",
            vec![
                github_issue(1, 1, "Real issue"),
                github_pull_request(2, 2, "A pull request"),
                github_issue(3, 3, "Another issue"),
            ],
        );
        let service = create_service(
            github,
            Arc::new(MemoryKvStore::new()),
            vec![test_source("a", "one", &["rust"])],
            options(),
        );

        let report = service.run().await.unwrap();

        let numbers: Vec<i64> = report.issues.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 3]);
        // The log counts what GitHub returned, before the PR filter
        assert!(report.logs.contains(&"Found 3 issues for a/one.".to_string()));
    }

    #[tokio::test]
    async fn queries_each_source_with_its_exact_label_in_order() {
        let github = Arc::new(MockGitHubClient::new());
        let service = AggregatorService::new(
            github.clone(),
            Arc::new(MemoryKvStore::new()),
            Registry::new(vec![
                RepositorySource::new("ethereum", "web3.py", "Good First Issue", &["python"]),
                RepositorySource::new("sigp", "lighthouse", "good first issue", &["rust"]),
            ]),
            options(),
        );

        service.run().await.unwrap();

        assert_eq!(
            github.issue_requests(),
            vec![
                (
                    "ethereum".to_string(),
                    "web3.py".to_string(),
                    "Good First Issue".to_string()
                ),
                (
                    "sigp".to_string(),
                    "lighthouse".to_string(),
                    "good first issue".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn persistence_failure_is_fatal() {
        let github = MockGitHubClient::new().with_issues("a", "one", vec![github_issue(1, 1, "x")]);
        let service = create_service(
            github,
            Arc::new(FailingKvStore),
            vec![test_source("a", "one", &["rust"])],
            options(),
        );

        let result = service.run().await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn run_overwrites_previous_snapshot() {
        let store = Arc::new(MemoryKvStore::new());
        let first = create_service(
            MockGitHubClient::new().with_issues(
                "a",
                "one",
                vec![github_issue(1, 1, "x"), github_issue(2, 2, "y")],
            ),
            store.clone(),
            vec![test_source("a", "one", &["rust"])],
            options(),
        );
        first.run().await.unwrap();

        let second = create_service(
            MockGitHubClient::new().with_status("a", "one", 500),
            store.clone(),
            vec![test_source("a", "one", &["rust"])],
            options(),
        );
        let report = second.run().await.unwrap();

        assert!(report.issues.is_empty());
        let snapshot = SnapshotReader::new(store).read().await.unwrap();
        assert!(snapshot.issues.is_empty());
    }

    #[tokio::test]
    async fn duplicate_registry_entries_do_not_duplicate_issues() {
        let github = MockGitHubClient::new().with_issues("a", "one", vec![github_issue(1, 1, "x")]);
        let service = create_service(
            github,
            Arc::new(MemoryKvStore::new()),
            vec![
                test_source("a", "one", &["rust"]),
                test_source("a", "one", &["go"]),
            ],
            options(),
        );

        let report = service.run().await.unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].tags, vec!["rust"]);
    }

    #[tokio::test]
    async fn same_upstream_id_in_two_repositories_is_kept_twice() {
        let github = MockGitHubClient::new()
            .with_issues("a", "one", vec![github_issue(77, 1, "x")])
            .with_issues("b", "two", vec![github_issue(77, 1, "y")]);
        let service = create_service(
            github,
            Arc::new(MemoryKvStore::new()),
            vec![
                test_source("a", "one", &["rust"]),
                test_source("b", "two", &["go"]),
            ],
            options(),
        );

        let report = service.run().await.unwrap();
        assert_eq!(report.issues.len(), 2);
    }

    #[tokio::test]
    async fn log_lines_follow_run_progress() {
        let github = MockGitHubClient::new().with_issues("a", "one", vec![github_issue(1, 1, "x")]);
        let service = create_service(
            github,
            Arc::new(MemoryKvStore::new()),
            vec![test_source("a", "one", &["rust"])],
            options(),
        );

        let report = service.run().await.unwrap();
        assert_eq!(
            report.logs,
            vec![
                "Fetching issues from 1 repositories...",
                "Fetching issues for a/one with label 'good first issue'...",
                "Found 1 issues for a/one.",
                "Total issues fetched: 1",
                "Successfully saved 1 issues to the key-value store.",
            ]
        );
    }

    // =========================================================================
    // enrichment tests
    // =========================================================================

    #[tokio::test]
    async fn enrichment_sets_counts_per_repository() {
        let github = MockGitHubClient::new()
            .with_issues(
                "a",
                "one",
                vec![github_issue(1, 1, "x"), github_issue(2, 2, "y")],
            )
            .with_issues("b", "two", vec![github_issue(3, 3, "z")])
            .with_repo_stats("a", "one", 120, 30);
        let service = create_service(
            github,
            Arc::new(MemoryKvStore::new()),
            vec![
                test_source("a", "one", &["rust"]),
                test_source("b", "two", &["go"]),
            ],
            AggregatorOptions {
                fetch_delay: Duration::ZERO,
                enrich: true,
            },
        );

        let report = service.run().await.unwrap();

        for issue in report.issues.iter().filter(|i| i.repository == "a/one") {
            assert_eq!(issue.stars, Some(120));
            assert_eq!(issue.forks, Some(30));
        }
        // No stats registered for b/two: the lookup fails and counts stay absent
        let other = report.issues.iter().find(|i| i.repository == "b/two").unwrap();
        assert_eq!(other.stars, None);
        assert_eq!(other.forks, None);
    }

    #[tokio::test]
    async fn enrichment_skips_repositories_without_issues() {
        let github = Arc::new(
            MockGitHubClient::new()
                .with_issues("a", "one", vec![github_issue(1, 1, "x")])
                .with_status("b", "two", 404),
        );
        let service = AggregatorService::new(
            github.clone(),
            Arc::new(MemoryKvStore::new()),
            Registry::new(vec![
                test_source("a", "one", &["rust"]),
                test_source("b", "two", &["go"]),
            ]),
            AggregatorOptions {
                fetch_delay: Duration::ZERO,
                enrich: true,
            },
        );

        service.run().await.unwrap();
        assert_eq!(github.repo_requests(), vec!["a/one".to_string()]);
    }

    #[tokio::test]
    async fn enrichment_looks_up_each_repository_once() {
        let github = Arc::new(
            MockGitHubClient::new()
                .with_label_issues("a", "one", "good first issue", vec![github_issue(1, 1, "x")])
                .with_label_issues("a", "one", "help wanted", vec![github_issue(2, 2, "y")])
                .with_repo_stats("a", "one", 50, 5),
        );
        let service = AggregatorService::new(
            github.clone(),
            Arc::new(MemoryKvStore::new()),
            Registry::new(vec![
                test_source("a", "one", &["rust"]),
                RepositorySource::new("a", "one", "help wanted", &["rust"]),
            ]),
            AggregatorOptions {
                fetch_delay: Duration::ZERO,
                enrich: true,
            },
        );

        let report = service.run().await.unwrap();

        assert_eq!(report.issues.len(), 2);
        assert!(report.issues.iter().all(|i| i.stars == Some(50)));
        assert_eq!(github.repo_requests(), vec!["a/one".to_string()]);
    }

    // =========================================================================
    // pacing tests
    // =========================================================================

    #[tokio::test]
    async fn pauses_between_sources_even_after_a_failure() {
        let delay = Duration::from_millis(50);
        let github = MockGitHubClient::new()
            .with_status("a", "one", 500)
            .with_issues("b", "two", vec![github_issue(1, 1, "x")])
            .with_issues("c", "three", vec![github_issue(2, 2, "y")]);
        let service = create_service(
            github,
            Arc::new(MemoryKvStore::new()),
            vec![
                test_source("a", "one", &["rust"]),
                test_source("b", "two", &["go"]),
                test_source("c", "three", &["go"]),
            ],
            AggregatorOptions {
                fetch_delay: delay,
                enrich: false,
            },
        );

        let started = tokio::time::Instant::now();
        let report = service.run().await.unwrap();

        assert!(started.elapsed() >= delay * 2);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn normalize_copies_fields_and_tags() {
        let source = test_source("x", "y", &["ethereum", "go"]);
        let issue = normalize(&source, github_issue(42, 7, "Fix wallet import bug"));

        assert_eq!(issue.id, 42);
        assert_eq!(issue.number, 7);
        assert_eq!(issue.title, "Fix wallet import bug");
        assert_eq!(issue.repository, "x/y");
        assert_eq!(issue.url, "https://github.com/example/repo/issues/7");
        assert_eq!(issue.tags, vec!["ethereum", "go"]);
        assert_eq!(issue.stars, None);
    }
}
