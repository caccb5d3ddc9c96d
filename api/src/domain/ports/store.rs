//! Key-value store port trait
//!
//! The snapshot lives in a hosted key-value store. Values are JSON documents;
//! `set` always overwrites.

use async_trait::async_trait;

use crate::error::StoreError;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Write a value, replacing whatever was there
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;
}
