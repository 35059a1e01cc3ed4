//! Snapshot command handlers with boundary logging.

#![allow(clippy::result_large_err)]

use lander_core::model::VariantSnapshot;
use lander_core::{log_op_end, log_op_error, log_op_start};
use lander_store::errors::Result;
use lander_store::{export_snapshot, import_snapshot, ImportOptions};
use rusqlite::Connection;
use std::time::Instant;

/// Export one variant with all of its sections
///
/// ## Errors
///
/// `NotFound` when the slug is absent.
pub fn snapshot_export(conn: &Connection, slug: &str) -> Result<VariantSnapshot> {
    log_op_start!("snapshot_export", slug = slug);
    let start = Instant::now();

    let result = export_snapshot(conn, slug).map_err(|e| {
        log_op_error!(
            "snapshot_export",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "snapshot_export",
        duration_ms = start.elapsed().as_millis() as u64,
        section_count = result.sections.len() as u64
    );
    Ok(result)
}

/// Import a snapshot onto the variant named by `slug`
///
/// All-or-nothing; returns the committed state.
///
/// ## Errors
///
/// - `InvalidInput`: slug mismatch or validation failure
/// - `NotFound`: slug absent, or deleted without `allow_resurrect`
pub fn snapshot_import(
    conn: &mut Connection,
    slug: &str,
    snapshot: &VariantSnapshot,
    options: ImportOptions,
) -> Result<VariantSnapshot> {
    log_op_start!(
        "snapshot_import",
        slug = slug,
        section_count = snapshot.sections.len() as u64
    );
    let start = Instant::now();

    let result = import_snapshot(conn, slug, snapshot, options).map_err(|e| {
        log_op_error!(
            "snapshot_import",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "snapshot_import",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}
