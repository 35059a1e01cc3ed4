//! Lander Store - SQLite persistence for variants and their content
//!
//! Provides:
//! - SQLite schema with migrations framework
//! - Variant Store (CRUD, lifecycle, active listing)
//! - Content Store (ordered sections, transactional full replacement)
//! - Axis catalog
//! - Snapshot export/import
//! - Snapshot directory sync

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod snapshot;
pub mod sync;

// Re-export key types
pub use errors::Result;
pub use repo::{AxisRepo, SectionRepo, VariantRepo};
pub use snapshot::{export_snapshot, import_snapshot, ImportOptions};
pub use sync::{run_sync, ApplyMode, MissingPolicy, SyncOptions, SyncReport};
