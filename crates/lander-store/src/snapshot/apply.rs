//! Shared validation and metadata application for import and sync

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::repo::{now, VariantRepo};
use lander_core::model::{AxisCatalog, NewVariant, Variant, VariantSnapshot, VariantStatus};
use lander_core::rules;
use rusqlite::Connection;

/// A snapshot that passed every write-path rule
#[derive(Debug, Clone)]
pub struct ValidatedSnapshot<'a> {
    snapshot: &'a VariantSnapshot,
    status: VariantStatus,
}

impl<'a> ValidatedSnapshot<'a> {
    pub fn snapshot(&self) -> &'a VariantSnapshot {
        self.snapshot
    }

    pub fn status(&self) -> VariantStatus {
        self.status
    }

    pub fn slug(&self) -> &'a str {
        &self.snapshot.variant.slug
    }
}

/// Check metadata and sections without touching storage
///
/// Status defaults to active; name, weight and axes follow the create rules;
/// sections are run through the replacement rules so a bad section is
/// reported before any row changes.
pub fn validate_snapshot<'a>(
    snapshot: &'a VariantSnapshot,
    catalog: &AxisCatalog,
) -> Result<ValidatedSnapshot<'a>> {
    let meta = &snapshot.variant;
    let status = rules::resolve_status(meta.status.as_deref())?;
    rules::validate_slug(&meta.slug)?;
    rules::validate_name(&meta.name)?;
    rules::validate_weight(meta.weight)?;
    rules::validate_axes(&meta.axes, catalog)?;
    rules::prepare_sections(&snapshot.sections)?;

    Ok(ValidatedSnapshot { snapshot, status })
}

/// Overwrite an existing variant's metadata and axes from a snapshot
///
/// The header is normalized against the snapshot's name; without a header the
/// stored one is kept and renormalized. `archived_at` keeps its stamp while the
/// variant stays archived, is stamped when it becomes archived and is cleared
/// when it becomes active.
pub(crate) fn apply_metadata_tx(
    conn: &Connection,
    mut variant: Variant,
    validated: &ValidatedSnapshot<'_>,
) -> Result<Variant> {
    let meta = &validated.snapshot().variant;
    let ts = now();
    let next_status = validated.status();

    variant.archived_at = match (variant.status, next_status) {
        (VariantStatus::Archived, VariantStatus::Archived) => variant.archived_at.or(Some(ts)),
        (_, VariantStatus::Archived) => Some(ts),
        (_, VariantStatus::Active) => None,
        (_, VariantStatus::Deleted) => variant.archived_at,
    };
    variant.status = next_status;
    variant.name = meta.name.trim().to_string();
    variant.description = meta
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    variant.weight = meta.weight;
    variant.header_config = match &meta.header {
        Some(header) => header.normalize(&variant.name),
        None => variant.header_config.normalize(&variant.name),
    };
    if let Some(seo) = &meta.seo {
        variant.seo_config = seo.clone();
    }
    variant.axes = meta.axes.clone();
    variant.updated_at = ts;

    VariantRepo::write_tx(conn, &variant)?;
    VariantRepo::replace_axes_tx(conn, &variant.id, &variant.axes)?;
    Ok(variant)
}

/// Insert a brand-new variant from a snapshot
pub(crate) fn create_from_snapshot_tx(
    conn: &Connection,
    validated: &ValidatedSnapshot<'_>,
) -> Result<Variant> {
    let meta = &validated.snapshot().variant;
    let input = NewVariant {
        slug: meta.slug.clone(),
        name: meta.name.clone(),
        description: meta.description.clone(),
        weight: meta.weight,
        axes: meta.axes.clone(),
    };
    VariantRepo::create_tx(
        conn,
        &input,
        validated.status(),
        meta.header.as_ref(),
        meta.seo.as_ref(),
    )
}
