//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod github;
pub mod kv;

pub use github::GitHubClientImpl;
pub use kv::{MemoryKvStore, RestKvStore};
