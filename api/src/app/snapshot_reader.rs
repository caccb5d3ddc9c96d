//! Snapshot reader
//!
//! Read side of the key-value store. A store that was never populated reads
//! as an empty issue list and an absent timestamp, never as an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::entities::{NormalizedIssue, Snapshot, ISSUES_KEY, LAST_UPDATE_KEY};
use crate::domain::ports::KeyValueStore;
use crate::error::StoreError;

pub struct SnapshotReader<KV: ?Sized> {
    store: Arc<KV>,
}

impl<KV> SnapshotReader<KV>
where
    KV: KeyValueStore + ?Sized,
{
    pub fn new(store: Arc<KV>) -> Self {
        Self { store }
    }

    /// The persisted issues, `None` if the key was never written
    pub async fn stored_issues(&self) -> Result<Option<Vec<NormalizedIssue>>, StoreError> {
        match self.store.get(ISSUES_KEY).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::Corrupt {
                    key: ISSUES_KEY.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    /// The persisted issues, empty if the store was never populated
    pub async fn issues(&self) -> Result<Vec<NormalizedIssue>, StoreError> {
        Ok(self.stored_issues().await?.unwrap_or_default())
    }

    /// Completion time of the last run, `None` if never set
    pub async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        match self.store.get(LAST_UPDATE_KEY).await? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) if raw.is_empty() => Ok(None),
            Some(Value::String(raw)) => DateTime::parse_from_rfc3339(&raw)
                .map(|at| Some(at.with_timezone(&Utc)))
                .map_err(|e| StoreError::Corrupt {
                    key: LAST_UPDATE_KEY.to_string(),
                    message: e.to_string(),
                }),
            Some(other) => Err(StoreError::Corrupt {
                key: LAST_UPDATE_KEY.to_string(),
                message: format!("expected a timestamp string, got {}", other),
            }),
        }
    }

    pub async fn read(&self) -> Result<Snapshot, StoreError> {
        Ok(Snapshot {
            issues: self.issues().await?,
            last_updated: self.last_updated().await?,
        })
    }
}
