//! Aggregation configuration constants
//!
//! Defaults for how the aggregator talks to GitHub.

/// Pause between two upstream requests, in milliseconds
pub const DEFAULT_FETCH_DELAY_MS: u64 = 1000;

/// GitHub REST API root
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Header the hosted scheduler adds to its trigger requests
pub const DEFAULT_CRON_MARKER_HEADER: &str = "x-vercel-cron";

/// Fetch star and fork counts after collecting issues
pub const DEFAULT_ENRICH_REPO_STATS: bool = true;
