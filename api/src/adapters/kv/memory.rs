//! In-process key-value store
//!
//! Values live for the lifetime of the process. Used when no hosted store is
//! configured and as the store in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::ports::KeyValueStore;
use crate::error::StoreError;

#[derive(Default)]
pub struct MemoryKvStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
