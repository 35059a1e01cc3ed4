//! Variant Store
//!
//! CRUD and lifecycle for variant records. Every write
//! touching both the variant row and its axis rows runs in one transaction.

#![allow(clippy::result_large_err)]

use crate::errors::{corrupt_column, from_rusqlite, not_found, Result};
use crate::repo::{from_millis, now, to_millis, AxisRepo};
use lander_core::errors::{ExError, ExErrorKind};
use lander_core::model::{HeaderConfig, NewVariant, Variant, VariantPatch, VariantStatus};
use lander_core::rules;
use rusqlite::{Connection, OptionalExtension, Row};
use std::collections::BTreeMap;

const VARIANT_COLUMNS: &str = "id, slug, name, description, weight, status, header_config, \
                               seo_config, created_at, updated_at, archived_at";

/// Raw variant row before JSON columns and axes are attached
struct VariantRow {
    id: String,
    slug: String,
    name: String,
    description: Option<String>,
    weight: i64,
    status: String,
    header_config: String,
    seo_config: serde_json::Value,
    created_at: i64,
    updated_at: i64,
    archived_at: Option<i64>,
}

impl VariantRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            slug: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            weight: row.get(4)?,
            status: row.get(5)?,
            header_config: row.get(6)?,
            seo_config: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
            archived_at: row.get(10)?,
        })
    }

    fn into_variant(self, conn: &Connection) -> Result<Variant> {
        let status = VariantStatus::parse(&self.status).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("decode_row")
                .with_entity_id(self.slug.clone())
                .with_field("status")
                .with_message(e.to_string())
        })?;
        let header: HeaderConfig = serde_json::from_str(&self.header_config)
            .map_err(|e| corrupt_column("header_config", e))?;
        let axes = load_axes(conn, &self.id)?;

        Ok(Variant {
            header_config: header.normalize(&self.name),
            id: self.id,
            slug: self.slug,
            name: self.name,
            description: self.description,
            weight: self.weight,
            status,
            axes,
            seo_config: self.seo_config,
            created_at: from_millis(self.created_at),
            updated_at: from_millis(self.updated_at),
            archived_at: self.archived_at.map(from_millis),
        })
    }
}

/// SQLite repository for variants
pub struct VariantRepo;

impl VariantRepo {
    /// Find a variant by slug, including deleted tombstones
    pub fn find_by_slug(conn: &Connection, slug: &str) -> Result<Option<Variant>> {
        let sql = format!("SELECT {} FROM variants WHERE slug = ?1", VARIANT_COLUMNS);
        let row = conn
            .query_row(&sql, [slug], VariantRow::read)
            .optional()
            .map_err(from_rusqlite)?;
        row.map(|r| r.into_variant(conn)).transpose()
    }

    /// Get a variant by slug
    ///
    /// Deleted variants stay fetchable here for administrative recovery.
    ///
    /// # Errors
    /// `NotFound` when no variant carries the slug.
    pub fn get_by_slug(conn: &Connection, slug: &str) -> Result<Variant> {
        Self::find_by_slug(conn, slug)?.ok_or_else(|| not_found("get_by_slug", slug, "Variant"))
    }

    /// List variants ordered by creation time
    ///
    /// Without a filter every non-deleted variant is returned; deleted ones
    /// only appear when explicitly requested.
    pub fn list(conn: &Connection, status: Option<VariantStatus>) -> Result<Vec<Variant>> {
        let (sql, param) = match status {
            Some(s) => (
                format!(
                    "SELECT {} FROM variants WHERE status = ?1 ORDER BY created_at ASC, rowid ASC",
                    VARIANT_COLUMNS
                ),
                s.as_str(),
            ),
            None => (
                format!(
                    "SELECT {} FROM variants WHERE status != ?1 ORDER BY created_at ASC, rowid ASC",
                    VARIANT_COLUMNS
                ),
                VariantStatus::Deleted.as_str(),
            ),
        };

        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([param], VariantRow::read)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        drop(stmt);

        rows.into_iter().map(|r| r.into_variant(conn)).collect()
    }

    /// Active variants in creation order
    pub fn list_active(conn: &Connection) -> Result<Vec<Variant>> {
        Self::list(conn, Some(VariantStatus::Active))
    }

    /// Create a variant with its axis rows in one transaction
    ///
    /// # Errors
    /// - `InvalidInput`: slug, name, weight or axes rejected
    /// - `AlreadyExists`: the slug is taken, tombstones included
    pub fn create(conn: &mut Connection, input: &NewVariant) -> Result<Variant> {
        let catalog = AxisRepo::catalog(conn)?;
        rules::validate_new_variant(input, &catalog)?;

        let tx = conn.transaction().map_err(from_rusqlite)?;
        let variant = Self::create_tx(&tx, input, VariantStatus::Active, None, None)?;
        tx.commit().map_err(from_rusqlite)?;

        Ok(variant)
    }

    /// Insert a validated variant inside the caller's transaction
    pub(crate) fn create_tx(
        conn: &Connection,
        input: &NewVariant,
        status: VariantStatus,
        header: Option<&HeaderConfig>,
        seo: Option<&serde_json::Value>,
    ) -> Result<Variant> {
        if Self::find_by_slug(conn, &input.slug)?.is_some() {
            return Err(ExError::new(ExErrorKind::AlreadyExists)
                .with_op("create_variant")
                .with_entity_id(input.slug.clone())
                .with_message("A variant with this slug already exists"));
        }

        let ts = now();
        let variant = Variant {
            id: uuid::Uuid::now_v7().to_string(),
            slug: input.slug.clone(),
            name: input.name.trim().to_string(),
            description: clean_description(input.description.as_deref()),
            weight: input.weight,
            status,
            axes: input.axes.clone(),
            header_config: HeaderConfig::normalize_or_default(header, &input.name),
            seo_config: seo.cloned().unwrap_or_else(|| serde_json::json!({})),
            created_at: ts,
            updated_at: ts,
            archived_at: (status == VariantStatus::Archived).then_some(ts),
        };

        conn.execute(
            "INSERT INTO variants (id, slug, name, description, weight, status, header_config, seo_config, created_at, updated_at, archived_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                variant.id,
                variant.slug,
                variant.name,
                variant.description,
                variant.weight,
                variant.status.as_str(),
                encode_header(&variant.header_config)?,
                variant.seo_config,
                to_millis(variant.created_at),
                to_millis(variant.updated_at),
                variant.archived_at.map(to_millis),
            ],
        )
        .map_err(from_rusqlite)?;

        replace_axes(conn, &variant.id, &variant.axes)?;
        Ok(variant)
    }

    /// Patch the supplied fields of a variant
    ///
    /// A supplied header is renormalized against the (possibly new) name; a
    /// supplied axis map fully replaces the prior set. Field patch and axis
    /// replacement commit together.
    ///
    /// # Errors
    /// - `NotFound`: slug absent or tombstoned
    /// - `InvalidInput`: name, weight or axes rejected
    pub fn update(conn: &mut Connection, slug: &str, patch: &VariantPatch) -> Result<Variant> {
        let catalog = AxisRepo::catalog(conn)?;
        rules::validate_patch(patch, &catalog)?;

        let tx = conn.transaction().map_err(from_rusqlite)?;
        let mut variant = Self::get_by_slug(&tx, slug)?;
        if variant.is_deleted() {
            return Err(not_found("update_variant", slug, "Variant"));
        }

        if let Some(name) = &patch.name {
            variant.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            variant.description = clean_description(Some(description));
        }
        if let Some(weight) = patch.weight {
            variant.weight = weight;
        }
        if let Some(header) = &patch.header_config {
            variant.header_config = header.normalize(&variant.name);
        }
        if let Some(seo) = &patch.seo_config {
            variant.seo_config = seo.clone();
        }
        variant.updated_at = now();
        Self::write_tx(&tx, &variant)?;

        if let Some(axes) = &patch.axes {
            replace_axes(&tx, &variant.id, axes)?;
            variant.axes = axes.clone();
        }

        tx.commit().map_err(from_rusqlite)?;
        Ok(variant)
    }

    /// Move a variant to archived, stamping `archived_at`
    ///
    /// Already-archived variants are returned unchanged.
    ///
    /// # Errors
    /// `NotFound` for absent or deleted variants.
    pub fn archive(conn: &Connection, slug: &str) -> Result<Variant> {
        let mut variant = Self::get_by_slug(conn, slug)?;
        match variant.status {
            VariantStatus::Deleted => Err(not_found("archive_variant", slug, "Variant")),
            VariantStatus::Archived => Ok(variant),
            VariantStatus::Active => {
                let ts = now();
                variant.status = VariantStatus::Archived;
                variant.archived_at = Some(ts);
                variant.updated_at = ts;
                Self::write_tx(conn, &variant)?;
                Ok(variant)
            }
        }
    }

    /// Soft-delete a variant
    ///
    /// # Errors
    /// `NotFound` when the slug is absent.
    pub fn delete(conn: &Connection, slug: &str) -> Result<()> {
        let mut variant = Self::get_by_slug(conn, slug)?;
        if variant.is_deleted() {
            return Ok(());
        }
        variant.status = VariantStatus::Deleted;
        variant.updated_at = now();
        Self::write_tx(conn, &variant)
    }

    /// Overwrite every mutable column of an existing row
    pub(crate) fn write_tx(conn: &Connection, variant: &Variant) -> Result<()> {
        let changed = conn
            .execute(
                "UPDATE variants SET
                    name = ?2,
                    description = ?3,
                    weight = ?4,
                    status = ?5,
                    header_config = ?6,
                    seo_config = ?7,
                    updated_at = ?8,
                    archived_at = ?9
                 WHERE id = ?1",
                rusqlite::params![
                    variant.id,
                    variant.name,
                    variant.description,
                    variant.weight,
                    variant.status.as_str(),
                    encode_header(&variant.header_config)?,
                    variant.seo_config,
                    to_millis(variant.updated_at),
                    variant.archived_at.map(to_millis),
                ],
            )
            .map_err(from_rusqlite)?;

        if changed == 0 {
            return Err(not_found("write_variant", &variant.slug, "Variant"));
        }
        Ok(())
    }

    /// Replace a variant's axis rows inside the caller's transaction
    pub(crate) fn replace_axes_tx(
        conn: &Connection,
        variant_id: &str,
        axes: &BTreeMap<String, String>,
    ) -> Result<()> {
        replace_axes(conn, variant_id, axes)
    }
}

fn load_axes(conn: &Connection, variant_id: &str) -> Result<BTreeMap<String, String>> {
    let mut stmt = conn
        .prepare("SELECT axis_id, value FROM variant_axes WHERE variant_id = ?1")
        .map_err(from_rusqlite)?;
    let axes = stmt
        .query_map([variant_id], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<BTreeMap<String, String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(axes)
}

fn replace_axes(conn: &Connection, variant_id: &str, axes: &BTreeMap<String, String>) -> Result<()> {
    conn.execute("DELETE FROM variant_axes WHERE variant_id = ?1", [variant_id])
        .map_err(from_rusqlite)?;
    for (axis, value) in axes {
        conn.execute(
            "INSERT INTO variant_axes (variant_id, axis_id, value) VALUES (?1, ?2, ?3)",
            rusqlite::params![variant_id, axis, value],
        )
        .map_err(from_rusqlite)?;
    }
    Ok(())
}

fn encode_header(header: &HeaderConfig) -> Result<String> {
    serde_json::to_string(header).map_err(|e| corrupt_column("header_config", e))
}

fn clean_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
