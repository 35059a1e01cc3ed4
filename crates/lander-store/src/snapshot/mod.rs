//! Snapshot export/import
//!
//! A snapshot is one variant's metadata plus its complete ordered section
//! list. Import is all-or-nothing: metadata, axes and sections commit in a
//! single transaction or not at all.

#![allow(clippy::result_large_err)]

pub mod apply;

pub use apply::{validate_snapshot, ValidatedSnapshot};

use crate::errors::{from_rusqlite, not_found, Result};
use crate::repo::{AxisRepo, SectionRepo, VariantRepo};
use lander_core::model::VariantSnapshot;
use lander_core::rules;
use rusqlite::Connection;

/// Knobs for [`import_snapshot`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Allow importing over a deleted tombstone
    pub allow_resurrect: bool,
}

/// Compose the variant and every stored section (enabled or not)
///
/// # Errors
/// `NotFound` when the slug is absent.
pub fn export_snapshot(conn: &Connection, slug: &str) -> Result<VariantSnapshot> {
    let variant = VariantRepo::get_by_slug(conn, slug)?;
    let sections = SectionRepo::list(conn, &variant.id)?;
    Ok(VariantSnapshot::from_parts(&variant, &sections))
}

/// Apply a snapshot to an existing variant
///
/// Validation runs in full before the transaction opens: route/payload slug
/// match, status, weight, axes and every section. Returns a fresh export of
/// the committed state.
///
/// # Errors
/// - `InvalidInput`: slug mismatch or any validation failure; nothing written
/// - `NotFound`: slug absent, or tombstoned without `allow_resurrect`
pub fn import_snapshot(
    conn: &mut Connection,
    slug: &str,
    snapshot: &VariantSnapshot,
    options: ImportOptions,
) -> Result<VariantSnapshot> {
    rules::validate_snapshot_slug(slug, &snapshot.variant.slug)?;
    let catalog = AxisRepo::catalog(conn)?;
    let validated = validate_snapshot(snapshot, &catalog)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let existing = VariantRepo::get_by_slug(&tx, slug)?;
    if existing.is_deleted() && !options.allow_resurrect {
        return Err(not_found("import_snapshot", slug, "Variant"));
    }

    let variant = apply::apply_metadata_tx(&tx, existing, &validated)?;
    SectionRepo::replace_in_tx(&tx, &variant.id, &validated.snapshot().sections)?;
    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(slug, "snapshot imported");
    export_snapshot(conn, slug)
}
