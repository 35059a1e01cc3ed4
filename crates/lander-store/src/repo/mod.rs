//! Repository layer for persisting domain models to SQLite

pub mod axis_repo;
pub mod section_repo;
pub mod variant_repo;

pub use axis_repo::AxisRepo;
pub use section_repo::SectionRepo;
pub use variant_repo::VariantRepo;

use chrono::{DateTime, Utc};

/// Timestamps are stored as UTC milliseconds
pub(crate) fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
}

/// Current time truncated to storage precision
pub(crate) fn now() -> DateTime<Utc> {
    from_millis(to_millis(Utc::now()))
}
