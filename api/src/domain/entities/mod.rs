//! Domain entities
//!
//! Pure domain models: repository sources, normalized issues, tag categories
//! and the persisted snapshot.

pub mod category;
pub mod issue;
pub mod snapshot;
pub mod source;

pub use category::{CategoryMap, TagGroup};
pub use issue::NormalizedIssue;
pub use snapshot::{format_timestamp, http_date, Snapshot, ISSUES_KEY, LAST_UPDATE_KEY};
pub use source::{Registry, RepositorySource};
