//! Key-value store adapters
//!
//! - `RestKvStore`: hosted store speaking the Upstash / Vercel KV REST protocol
//! - `MemoryKvStore`: process-local store for development and tests

pub mod memory;
pub mod rest;

pub use memory::MemoryKvStore;
pub use rest::RestKvStore;
