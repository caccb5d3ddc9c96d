//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Manual mocks instead of mockall: the port traits take `&str` parameters,
//! and hand-written mocks let tests inspect the calls they received.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
