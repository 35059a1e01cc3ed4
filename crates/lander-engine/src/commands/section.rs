//! Section command handlers with boundary logging.

#![allow(clippy::result_large_err)]

use lander_core::model::{ContentSection, NewSection, SectionInput};
use lander_core::{log_op_end, log_op_error, log_op_start};
use lander_store::errors::{from_rusqlite, Result};
use lander_store::repo::{SectionRepo, VariantRepo};
use rusqlite::Connection;
use std::time::Instant;

/// Create one section on a variant
///
/// ## Errors
///
/// - `InvalidInput`: type outside the vocabulary or null content
/// - `NotFound`: unknown variant
pub fn section_create(conn: &Connection, input: &NewSection) -> Result<ContentSection> {
    log_op_start!(
        "section_create",
        variant_id = input.variant_id.as_str(),
        section_type = input.section_type.as_str()
    );
    let start = Instant::now();

    let result = SectionRepo::create(conn, input).map_err(|e| {
        log_op_error!(
            "section_create",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "section_create",
        duration_ms = start.elapsed().as_millis() as u64,
        section_id = result.id.as_str()
    );
    Ok(result)
}

/// Replace the content document of one section
///
/// ## Errors
///
/// - `InvalidInput`: null content
/// - `NotFound`: unknown section
pub fn section_update_content(
    conn: &Connection,
    section_id: &str,
    content: &serde_json::Value,
) -> Result<ContentSection> {
    log_op_start!("section_update_content", section_id = section_id);
    let start = Instant::now();

    let result = SectionRepo::update_content(conn, section_id, content).map_err(|e| {
        log_op_error!(
            "section_update_content",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "section_update_content",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

/// Delete one section
///
/// ## Errors
///
/// `NotFound` for an unknown section.
pub fn section_delete(conn: &Connection, section_id: &str) -> Result<()> {
    log_op_start!("section_delete", section_id = section_id);
    let start = Instant::now();

    SectionRepo::delete(conn, section_id).map_err(|e| {
        log_op_error!(
            "section_delete",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "section_delete",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(())
}

/// Replace every section of the variant named by `slug` in one transaction
///
/// ## Errors
///
/// - `NotFound`: unknown slug
/// - `InvalidInput`: any section rejected; stored sections are unchanged
pub fn sections_replace(
    conn: &mut Connection,
    slug: &str,
    inputs: &[SectionInput],
) -> Result<Vec<ContentSection>> {
    log_op_start!("sections_replace", slug = slug, section_count = inputs.len() as u64);
    let start = Instant::now();

    let result = sections_replace_impl(conn, slug, inputs).map_err(|e| {
        log_op_error!(
            "sections_replace",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "sections_replace",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

fn sections_replace_impl(
    conn: &mut Connection,
    slug: &str,
    inputs: &[SectionInput],
) -> Result<Vec<ContentSection>> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let variant = VariantRepo::get_by_slug(&tx, slug)?;
    let written = SectionRepo::replace_in_tx(&tx, &variant.id, inputs)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(written)
}
