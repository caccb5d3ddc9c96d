//! Snapshot entity
//!
//! The snapshot is the single, wholesale-replaced result of the most recent
//! aggregation run: the issue list plus the time the run completed.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::NormalizedIssue;

/// Store key holding the issue array
pub const ISSUES_KEY: &str = "all_issues_data";

/// Store key holding the completion timestamp of the last run
pub const LAST_UPDATE_KEY: &str = "last_cron_update_timestamp";

#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub issues: Vec<NormalizedIssue>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// RFC 3339 with millisecond precision and a `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// HTTP-date (RFC 7231 IMF-fixdate), as used by `Last-Modified`
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_has_millis_and_z_suffix() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
        assert_eq!(format_timestamp(at), "2024-05-17T08:30:00.000Z");
    }

    #[test]
    fn formatted_timestamp_parses_back() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
        let parsed = DateTime::parse_from_rfc3339(&format_timestamp(at)).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), at);
    }

    #[test]
    fn http_date_format() {
        let at = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
        assert_eq!(http_date(at), "Sun, 06 Nov 1994 08:49:37 GMT");
    }
}
