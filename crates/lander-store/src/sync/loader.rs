//! Snapshot directory loader
//!
//! One file per variant, named by slug. `.json`, `.yaml` and `.yml` files are
//! read; anything else, including dotfiles, is ignored.

#![allow(clippy::result_large_err)]

use crate::errors::{invalid_input, io_error, Result};
use lander_core::errors::{ExError, ExErrorKind};
use lander_core::model::VariantSnapshot;
use lander_core::rules;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed snapshot with its effective slug filled in
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub path: PathBuf,
    pub snapshot: VariantSnapshot,
}

impl LoadedSnapshot {
    pub fn slug(&self) -> &str {
        &self.snapshot.variant.slug
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "json" => Some(Format::Json),
        "yaml" | "yml" => Some(Format::Yaml),
        _ => None,
    }
}

/// Read every snapshot file in `dir`, sorted by file name
///
/// A missing directory yields an empty list; the caller decides whether that
/// is an error.
///
/// # Errors
/// - `Io`: the directory or a file cannot be read
/// - `Serialization`: a file does not parse
/// - `InvalidInput`: a snapshot slug disagrees with its file name, or two files
///   name the same slug
pub fn load_dir(dir: &Path) -> Result<Vec<LoadedSnapshot>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| io_error("sync_read_dir", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| io_error("sync_read_dir", e))?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            !path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
        })
        .filter(|path| format_of(path).is_some())
        .collect();
    paths.sort();

    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        let snapshot = load_file(&path)?;
        if let Some(previous) = seen.insert(snapshot.variant.slug.clone(), path.clone()) {
            return Err(invalid_input(
                "sync_load",
                "variant.slug",
                format!(
                    "Slug '{}' is defined by both {} and {}",
                    snapshot.variant.slug,
                    previous.display(),
                    path.display()
                ),
            ));
        }
        loaded.push(LoadedSnapshot { path, snapshot });
    }

    Ok(loaded)
}

/// Parse one snapshot file, inheriting the slug from the file stem when blank
pub fn load_file(path: &Path) -> Result<VariantSnapshot> {
    let format = format_of(path).ok_or_else(|| {
        invalid_input(
            "sync_load",
            "path",
            format!("Unsupported snapshot file: {}", path.display()),
        )
    })?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let raw = fs::read_to_string(path).map_err(|e| io_error("sync_read_file", e))?;
    let mut snapshot = parse(&raw, format).map_err(|e| e.with_entity_id(path.display().to_string()))?;

    let payload = snapshot.variant.slug.trim().to_string();
    if payload.is_empty() {
        snapshot.variant.slug = stem;
    } else {
        rules::validate_snapshot_slug(&stem, &payload)?;
        snapshot.variant.slug = payload;
    }

    Ok(snapshot)
}

fn parse(raw: &str, format: Format) -> Result<VariantSnapshot> {
    match format {
        Format::Json => serde_json::from_str(raw).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("sync_parse")
                .with_message(format!("JSON parse error: {}", e))
        }),
        Format::Yaml => serde_yaml::from_str(raw).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("sync_parse")
                .with_message(format!("YAML parse error: {}", e))
        }),
    }
}
