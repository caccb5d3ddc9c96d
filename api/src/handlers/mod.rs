//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod cron;
pub mod issues;
pub mod updates;

pub use cron::{test_cron, update_issues};
pub use issues::{get_issues, issues_json, list_tags, search_issues};
pub use updates::{get_last_update, verify_timestamp};
