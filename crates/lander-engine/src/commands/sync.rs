//! Snapshot sync command with boundary logging.

#![allow(clippy::result_large_err)]

use lander_core::observability::Observer;
use lander_core::{log_op_end, log_op_error, log_op_start};
use lander_core_types::schema::EVENT_SYNC_APPLIED;
use lander_store::errors::Result;
use lander_store::{run_sync, SyncOptions, SyncReport};
use rusqlite::Connection;
use std::time::Instant;

/// Apply the snapshot directory and report what changed
///
/// A successful run emits `sync.applied` with per-outcome counts.
///
/// ## Errors
///
/// Any load, validation or storage failure; the store is left untouched.
pub fn sync_run(
    conn: &mut Connection,
    options: &SyncOptions,
    observer: &dyn Observer,
) -> Result<SyncReport> {
    let dir = options.snapshot_dir.display().to_string();
    log_op_start!("sync_run", snapshot_dir = dir.as_str());
    let start = Instant::now();

    let report = run_sync(conn, options).map_err(|e| {
        log_op_error!(
            "sync_run",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    observer.event(
        EVENT_SYNC_APPLIED,
        &[
            ("snapshot_dir", dir),
            ("created", report.created.len().to_string()),
            ("updated", report.updated.len().to_string()),
            ("resurrected", report.resurrected.len().to_string()),
            ("skipped", report.skipped.len().to_string()),
            ("archived", report.archived.len().to_string()),
            ("deleted", report.deleted.len().to_string()),
        ],
    );

    log_op_end!(
        "sync_run",
        duration_ms = start.elapsed().as_millis() as u64,
        applied = report.applied() as u64
    );
    Ok(report)
}
