//! Variant command handlers with boundary logging.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for variant operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

#![allow(clippy::result_large_err)]

use crate::selector::VariantSelector;
use lander_core::model::{AxisCatalog, NewVariant, Variant, VariantPatch, VariantStatus};
use lander_core::observability::Observer;
use lander_core::{log_op_end, log_op_error, log_op_start};
use lander_core_types::schema::{
    EVENT_SECTION_COPY_FAILED, FIELD_ERROR, FIELD_VARIANT_ID, FIELD_VARIANT_SLUG,
};
use lander_store::errors::Result;
use lander_store::repo::{AxisRepo, SectionRepo, VariantRepo};
use rusqlite::Connection;
use std::time::Instant;

/// Outcome of [`variant_create`]
#[derive(Debug, Clone, PartialEq)]
pub struct VariantCreated {
    pub variant: Variant,
    /// Sections copied from the source variant; zero when no source was given
    /// or the copy failed
    pub copied_sections: usize,
}

/// Create a variant, optionally seeding its sections from another variant
///
/// The copy is best-effort: when it fails the variant still exists, the
/// failure is reported through `observer` and `copied_sections` is zero.
///
/// ## Errors
///
/// - `InvalidInput`: slug, name, weight or axes rejected
/// - `AlreadyExists`: slug taken
/// - `Persistence`: database error
pub fn variant_create(
    conn: &mut Connection,
    input: &NewVariant,
    copy_from: Option<&str>,
    observer: &dyn Observer,
) -> Result<VariantCreated> {
    log_op_start!("variant_create", slug = input.slug.as_str());
    let start = Instant::now();

    let result = variant_create_impl(conn, input, copy_from, observer).map_err(|e| {
        log_op_error!(
            "variant_create",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "variant_create",
        duration_ms = start.elapsed().as_millis() as u64,
        variant_id = result.variant.id.as_str(),
        section_count = result.copied_sections as u64
    );

    Ok(result)
}

fn variant_create_impl(
    conn: &mut Connection,
    input: &NewVariant,
    copy_from: Option<&str>,
    observer: &dyn Observer,
) -> Result<VariantCreated> {
    let variant = VariantRepo::create(conn, input)?;

    let Some(source_slug) = copy_from.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(VariantCreated {
            variant,
            copied_sections: 0,
        });
    };

    let copied = VariantRepo::get_by_slug(conn, source_slug)
        .and_then(|source| SectionRepo::copy_from_variant(conn, &source.id, &variant.id));

    let copied_sections = match copied {
        Ok(count) => count,
        Err(e) => {
            observer.event(
                EVENT_SECTION_COPY_FAILED,
                &[
                    (FIELD_VARIANT_SLUG, variant.slug.clone()),
                    (FIELD_VARIANT_ID, variant.id.clone()),
                    ("source", source_slug.to_string()),
                    (FIELD_ERROR, e.to_string()),
                ],
            );
            0
        }
    };

    Ok(VariantCreated {
        variant,
        copied_sections,
    })
}

/// Patch a variant
///
/// ## Errors
///
/// - `NotFound`: slug absent or deleted
/// - `InvalidInput`: patch rejected
pub fn variant_update(conn: &mut Connection, slug: &str, patch: &VariantPatch) -> Result<Variant> {
    log_op_start!("variant_update", slug = slug);
    let start = Instant::now();

    let result = VariantRepo::update(conn, slug, patch).map_err(|e| {
        log_op_error!(
            "variant_update",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "variant_update",
        duration_ms = start.elapsed().as_millis() as u64,
        variant_id = result.id.as_str()
    );
    Ok(result)
}

/// Archive a variant
///
/// ## Errors
///
/// `NotFound` for absent or deleted variants.
pub fn variant_archive(conn: &Connection, slug: &str) -> Result<Variant> {
    log_op_start!("variant_archive", slug = slug);
    let start = Instant::now();

    let result = VariantRepo::archive(conn, slug).map_err(|e| {
        log_op_error!(
            "variant_archive",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "variant_archive",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

/// Soft-delete a variant
///
/// ## Errors
///
/// `NotFound` when the slug is absent.
pub fn variant_delete(conn: &Connection, slug: &str) -> Result<()> {
    log_op_start!("variant_delete", slug = slug);
    let start = Instant::now();

    VariantRepo::delete(conn, slug).map_err(|e| {
        log_op_error!(
            "variant_delete",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "variant_delete",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(())
}

/// List variants; deleted ones only when asked for
pub fn variant_list(conn: &Connection, status: Option<VariantStatus>) -> Result<Vec<Variant>> {
    VariantRepo::list(conn, status)
}

/// Known axes and their allowed values
pub fn list_axes(conn: &Connection) -> Result<AxisCatalog> {
    AxisRepo::catalog(conn)
}

/// Fetch a variant by slug, tombstones included
///
/// ## Errors
///
/// `NotFound` when the slug is absent.
pub fn variant_get(conn: &Connection, slug: &str) -> Result<Variant> {
    VariantRepo::get_by_slug(conn, slug)
}

/// Draw one active variant with the shared selector
///
/// ## Errors
///
/// `NoActiveVariants` when nothing is active.
pub fn variant_select(conn: &Connection, selector: &VariantSelector) -> Result<Variant> {
    log_op_start!("variant_select");
    let start = Instant::now();

    let result = selector.select(conn).map_err(|e| {
        log_op_error!(
            "variant_select",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "variant_select",
        duration_ms = start.elapsed().as_millis() as u64,
        slug = result.slug.as_str()
    );
    Ok(result)
}
