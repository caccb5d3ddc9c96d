//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod github;
pub mod store;

pub use github::{GitHubClient, GitHubIssue, GitHubRepo};
pub use store::KeyValueStore;
