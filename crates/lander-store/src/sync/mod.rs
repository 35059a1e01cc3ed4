//! Snapshot Sync
//!
//! Applies a directory of snapshot files to the store in one transaction.
//! Every file is parsed and validated before the first write, so a single bad
//! snapshot leaves the store untouched.

#![allow(clippy::result_large_err)]

pub mod loader;

pub use loader::{load_dir, load_file, LoadedSnapshot};

use crate::errors::{from_rusqlite, invalid_input, Result};
use crate::repo::{AxisRepo, SectionRepo, VariantRepo};
use crate::snapshot::apply::{apply_metadata_tx, create_from_snapshot_tx};
use crate::snapshot::validate_snapshot;
use lander_core::errors::{ExError, ExErrorKind};
use lander_core::model::VariantStatus;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// What a sync writes for variants that already exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Replace sections only; stored metadata is left alone
    #[serde(alias = "content")]
    ContentOnly,
    /// Replace metadata, axes and sections
    #[default]
    Full,
}

/// What happens to stored variants with no snapshot file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    #[default]
    Ignore,
    Archive,
    Delete,
}

/// Sync policy flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    pub snapshot_dir: PathBuf,
    pub apply_mode: ApplyMode,
    pub missing_policy: MissingPolicy,
    /// Bring deleted variants back when a snapshot names them
    pub allow_resurrect: bool,
    /// Fail when the directory is missing or holds no snapshots
    pub required: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("snapshots"),
            apply_mode: ApplyMode::default(),
            missing_policy: MissingPolicy::default(),
            allow_resurrect: false,
            required: false,
        }
    }
}

/// Slugs touched by a sync, per outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub resurrected: Vec<String>,
    /// Deleted variants left alone because resurrection is off
    pub skipped: Vec<String>,
    pub archived: Vec<String>,
    pub deleted: Vec<String>,
}

impl SyncReport {
    pub fn applied(&self) -> usize {
        self.created.len() + self.updated.len() + self.resurrected.len()
    }

    pub fn is_noop(&self) -> bool {
        self.applied() == 0
            && self.skipped.is_empty()
            && self.archived.is_empty()
            && self.deleted.is_empty()
    }
}

/// Run a sync against `conn`
///
/// An absent directory without `required` is a no-op; the missing policy only
/// runs against a directory that exists.
///
/// 1. Load every snapshot file from the directory.
/// 2. Validate all of them against the axis catalog and section rules.
/// 3. In one transaction: create absent variants, update existing ones per
///    `apply_mode`, resurrect or skip tombstones, then apply
///    `missing_policy` to stored variants without a file.
///
/// # Errors
/// - `NotFound`: `required` is set and the directory does not exist
/// - `InvalidInput`: `required` is set and no snapshots were found, or any
///   snapshot fails validation
/// - `Io`/`Serialization`: a file cannot be read or parsed
pub fn run_sync(conn: &mut Connection, options: &SyncOptions) -> Result<SyncReport> {
    let dir = &options.snapshot_dir;
    if !dir.is_dir() {
        if options.required {
            return Err(ExError::new(ExErrorKind::NotFound)
                .with_op("sync")
                .with_entity_id(dir.display().to_string())
                .with_message("Snapshot directory does not exist"));
        }
        // An absent directory is not an empty snapshot set: nothing is pruned
        tracing::debug!(dir = %dir.display(), "snapshot directory absent, sync skipped");
        return Ok(SyncReport::default());
    }

    let loaded = load_dir(dir)?;
    if options.required && loaded.is_empty() {
        return Err(invalid_input(
            "sync",
            "snapshot_dir",
            format!("No snapshots found in {}", dir.display()),
        ));
    }

    let catalog = AxisRepo::catalog(conn)?;
    let validated = loaded
        .iter()
        .map(|l| {
            validate_snapshot(&l.snapshot, &catalog)
                .map_err(|e| e.with_entity_id(l.path.display().to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut report = SyncReport::default();
    let tx = conn.transaction().map_err(from_rusqlite)?;

    for snapshot in &validated {
        let slug = snapshot.slug();
        let sections = &snapshot.snapshot().sections;

        match VariantRepo::find_by_slug(&tx, slug)? {
            None => {
                let variant = create_from_snapshot_tx(&tx, snapshot)?;
                SectionRepo::replace_in_tx(&tx, &variant.id, sections)?;
                report.created.push(slug.to_string());
            }
            Some(existing) if existing.is_deleted() => {
                if !options.allow_resurrect {
                    report.skipped.push(slug.to_string());
                    continue;
                }
                let variant = apply_metadata_tx(&tx, existing, snapshot)?;
                SectionRepo::replace_in_tx(&tx, &variant.id, sections)?;
                report.resurrected.push(slug.to_string());
            }
            Some(existing) => {
                let variant_id = match options.apply_mode {
                    ApplyMode::Full => apply_metadata_tx(&tx, existing, snapshot)?.id,
                    ApplyMode::ContentOnly => existing.id,
                };
                SectionRepo::replace_in_tx(&tx, &variant_id, sections)?;
                report.updated.push(slug.to_string());
            }
        }
    }

    if options.missing_policy != MissingPolicy::Ignore {
        let present: BTreeSet<&str> = validated.iter().map(|v| v.slug()).collect();
        for variant in VariantRepo::list(&tx, None)? {
            if present.contains(variant.slug.as_str()) {
                continue;
            }
            match options.missing_policy {
                MissingPolicy::Archive if variant.status == VariantStatus::Active => {
                    VariantRepo::archive(&tx, &variant.slug)?;
                    report.archived.push(variant.slug);
                }
                MissingPolicy::Delete => {
                    VariantRepo::delete(&tx, &variant.slug)?;
                    report.deleted.push(variant.slug);
                }
                _ => {}
            }
        }
    }

    tx.commit().map_err(from_rusqlite)?;
    tracing::debug!(
        dir = %dir.display(),
        created = report.created.len(),
        updated = report.updated.len(),
        "sync committed"
    );
    Ok(report)
}
