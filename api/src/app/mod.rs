//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod aggregation_config;
pub mod aggregator;
pub mod filter;
pub mod snapshot_reader;

#[allow(unused_imports)]
pub use aggregation_config::*;
pub use aggregator::{AggregatorOptions, AggregatorService};
pub use filter::{derive_tags, filter_issues, group_tags, sort_issues, SortOrder};
pub use snapshot_reader::SnapshotReader;
