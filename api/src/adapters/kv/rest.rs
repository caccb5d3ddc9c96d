//! REST key-value store client
//!
//! Speaks the Upstash REST protocol used by Vercel KV: each command is a JSON
//! array POSTed to the store URL, answered with `{"result": ...}` or
//! `{"error": "..."}`. Values are stored as JSON-encoded strings, so data
//! written by other clients of the same store reads back unchanged.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::KeyValueStore;
use crate::error::StoreError;

pub struct RestKvStore {
    http: Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct CommandResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl RestKvStore {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn command(&self, args: &[&str]) -> Result<Option<Value>, StoreError> {
        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(args)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Error replies carry a JSON body too, so decode before checking status
        match serde_json::from_str::<CommandResponse>(&body) {
            Ok(CommandResponse {
                error: Some(error), ..
            }) => Err(StoreError::Backend(error)),
            Ok(CommandResponse { result, .. }) if status.is_success() => Ok(result),
            _ => Err(StoreError::Backend(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            ))),
        }
    }
}

/// Stored strings are JSON documents; anything else is returned verbatim
fn decode_stored(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

#[async_trait]
impl KeyValueStore for RestKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self.command(&["GET", key]).await? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => Ok(Some(decode_stored(raw))),
            Some(other) => Err(StoreError::Corrupt {
                key: key.to_string(),
                message: format!("unexpected GET reply: {}", other),
            }),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(&value)?;
        self.command(&["SET", key, &encoded]).await?;
        Ok(())
    }
}
