use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::app::{
    DEFAULT_CRON_MARKER_HEADER, DEFAULT_ENRICH_REPO_STATS, DEFAULT_FETCH_DELAY_MS,
    DEFAULT_GITHUB_API_URL,
};

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// `development` relaxes trigger auth when no secret is configured
    pub app_env: String,
    /// Optional; unauthenticated GitHub requests get a much lower rate limit
    pub github_token: Option<String>,
    pub github_api_url: String,
    /// Shared secret accepted as `Authorization: Bearer <secret>` on triggers
    pub cron_secret: Option<String>,
    /// Header the hosted scheduler attaches to its requests
    pub cron_marker_header: String,
    pub kv_rest_api_url: Option<String>,
    pub kv_rest_api_token: Option<String>,
    pub fetch_delay: Duration,
    pub enrich_repo_stats: bool,
    /// JSON registry replacing the built-in one
    pub registry_path: Option<PathBuf>,
    pub rate_limit_triggers: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            app_env: var("APP_ENV").unwrap_or_else(|| "production".to_string()),
            github_token: var("GITHUB_TOKEN"),
            github_api_url: var("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            cron_secret: var("CRON_SECRET"),
            cron_marker_header: var("CRON_MARKER_HEADER")
                .map(|h| h.to_lowercase())
                .unwrap_or_else(|| DEFAULT_CRON_MARKER_HEADER.to_string()),
            kv_rest_api_url: var("KV_REST_API_URL"),
            kv_rest_api_token: var("KV_REST_API_TOKEN"),
            fetch_delay: Duration::from_millis(
                var("FETCH_DELAY_MS")
                    .and_then(|ms| ms.parse().ok())
                    .unwrap_or(DEFAULT_FETCH_DELAY_MS),
            ),
            enrich_repo_stats: var("ENRICH_REPO_STATS")
                .map(|v| parse_flag(&v))
                .unwrap_or(DEFAULT_ENRICH_REPO_STATS),
            registry_path: var("GFI_REGISTRY_PATH").map(PathBuf::from),
            rate_limit_triggers: var("TRIGGER_RATE_LIMIT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }

    pub fn dev_mode(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests: no delay, no enrichment, no governor
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            app_env: "test".to_string(),
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            cron_secret: Some("test-cron-secret".to_string()),
            cron_marker_header: DEFAULT_CRON_MARKER_HEADER.to_string(),
            kv_rest_api_url: None,
            kv_rest_api_token: None,
            fetch_delay: Duration::ZERO,
            enrich_repo_stats: false,
            registry_path: None,
            rate_limit_triggers: false,
        }
    }
}
