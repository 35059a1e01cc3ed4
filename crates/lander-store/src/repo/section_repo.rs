//! Content Store
//!
//! Ordered sections per variant. Full replacement is the only multi-row write
//! and it refuses to run outside a transaction.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, invalid_input, not_found, transaction_required, Result};
use crate::repo::{from_millis, now, to_millis};
use lander_core::errors::ExError;
use lander_core::model::{ContentSection, NewSection, PreparedSection, SectionInput};
use lander_core::rules;
use rusqlite::{Connection, OptionalExtension, Row};

const SECTION_COLUMNS: &str =
    "id, variant_id, section_type, content, sort_order, enabled, created_at, updated_at";

fn read_section(row: &Row<'_>) -> rusqlite::Result<ContentSection> {
    Ok(ContentSection {
        id: row.get(0)?,
        variant_id: row.get(1)?,
        section_type: row.get(2)?,
        content: row.get(3)?,
        order: row.get(4)?,
        enabled: row.get(5)?,
        created_at: from_millis(row.get(6)?),
        updated_at: from_millis(row.get(7)?),
    })
}

/// SQLite repository for content sections
pub struct SectionRepo;

impl SectionRepo {
    /// All sections of a variant, enabled or not
    pub fn list(conn: &Connection, variant_id: &str) -> Result<Vec<ContentSection>> {
        Self::query(conn, variant_id, false)
    }

    /// Enabled sections only, as served to the public page
    pub fn list_public(conn: &Connection, variant_id: &str) -> Result<Vec<ContentSection>> {
        Self::query(conn, variant_id, true)
    }

    fn query(conn: &Connection, variant_id: &str, enabled_only: bool) -> Result<Vec<ContentSection>> {
        let filter = if enabled_only { " AND enabled = 1" } else { "" };
        let sql = format!(
            "SELECT {} FROM content_sections WHERE variant_id = ?1{} ORDER BY sort_order ASC, rowid ASC",
            SECTION_COLUMNS, filter
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let sections = stmt
            .query_map([variant_id], read_section)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(sections)
    }

    /// Get one section by id
    pub fn get(conn: &Connection, section_id: &str) -> Result<ContentSection> {
        let sql = format!("SELECT {} FROM content_sections WHERE id = ?1", SECTION_COLUMNS);
        conn.query_row(&sql, [section_id], read_section)
            .optional()
            .map_err(from_rusqlite)?
            .ok_or_else(|| not_found("get_section", section_id, "Section"))
    }

    /// Create a single section
    ///
    /// The section type must be in the vocabulary; it is stored in its
    /// canonical lowercase form. An order <= 0 appends after the current
    /// last section.
    ///
    /// # Errors
    /// - `InvalidInput`: unknown type or null content
    /// - `NotFound`: the owning variant does not exist
    pub fn create(conn: &Connection, input: &NewSection) -> Result<ContentSection> {
        let as_input = SectionInput {
            section_type: input.section_type.clone(),
            content: input.content.clone(),
            order: input.order,
            enabled: Some(input.enabled),
        };
        let section_type = rules::validate_section_input(0, &as_input)?;
        ensure_variant(conn, "create_section", &input.variant_id)?;

        let order = if input.order > 0 {
            input.order
        } else {
            next_order(conn, &input.variant_id)?
        };

        let ts = now();
        let section = ContentSection {
            id: uuid::Uuid::now_v7().to_string(),
            variant_id: input.variant_id.clone(),
            section_type: section_type.as_str().to_string(),
            content: input.content.clone(),
            order,
            enabled: input.enabled,
            created_at: ts,
            updated_at: ts,
        };
        insert(conn, &section)?;
        Ok(section)
    }

    /// Replace a section's content document
    ///
    /// # Errors
    /// - `InvalidInput`: null content
    /// - `NotFound`: unknown section id
    pub fn update_content(
        conn: &Connection,
        section_id: &str,
        content: &serde_json::Value,
    ) -> Result<ContentSection> {
        if content.is_null() {
            return Err(invalid_input(
                "update_section_content",
                "content",
                "Section content must not be null",
            )
            .with_entity_id(section_id));
        }

        let changed = conn
            .execute(
                "UPDATE content_sections SET content = ?2, updated_at = ?3 WHERE id = ?1",
                rusqlite::params![section_id, content, to_millis(now())],
            )
            .map_err(from_rusqlite)?;
        if changed == 0 {
            return Err(not_found("update_section_content", section_id, "Section"));
        }

        Self::get(conn, section_id)
    }

    /// Delete one section
    ///
    /// # Errors
    /// `NotFound` for an unknown section id.
    pub fn delete(conn: &Connection, section_id: &str) -> Result<()> {
        let changed = conn
            .execute("DELETE FROM content_sections WHERE id = ?1", [section_id])
            .map_err(from_rusqlite)?;
        if changed == 0 {
            return Err(not_found("delete_section", section_id, "Section"));
        }
        Ok(())
    }

    /// Duplicate every section of `source_id` onto `target_id`
    ///
    /// Copies get fresh ids and keep type, content, order and enabled flag.
    /// Returns the number of sections copied.
    pub fn copy_from_variant(conn: &mut Connection, source_id: &str, target_id: &str) -> Result<usize> {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        ensure_variant(&tx, "copy_sections", source_id)?;
        ensure_variant(&tx, "copy_sections", target_id)?;

        let sources = Self::list(&tx, source_id)?;
        let ts = now();
        for source in &sources {
            insert(
                &tx,
                &ContentSection {
                    id: uuid::Uuid::now_v7().to_string(),
                    variant_id: target_id.to_string(),
                    created_at: ts,
                    updated_at: ts,
                    ..source.clone()
                },
            )?;
        }
        tx.commit().map_err(from_rusqlite)?;

        Ok(sources.len())
    }

    /// Replace the whole section list of a variant
    ///
    /// Must be called with an open transaction on `conn`: the delete and the
    /// inserts commit or roll back with the caller's other writes. Every input
    /// is validated before the existing rows are touched.
    ///
    /// # Errors
    /// - `TransactionRequired`: `conn` is in autocommit mode
    /// - `InvalidInput`: any input fails validation; nothing is written
    pub fn replace_in_tx(
        conn: &Connection,
        variant_id: &str,
        inputs: &[SectionInput],
    ) -> Result<Vec<ContentSection>> {
        if conn.is_autocommit() {
            return Err(transaction_required("replace_sections", variant_id));
        }

        let prepared = rules::prepare_sections(inputs).map_err(|v| {
            ExError::from(v)
                .with_op("replace_sections")
                .with_entity_id(variant_id)
        })?;

        conn.execute("DELETE FROM content_sections WHERE variant_id = ?1", [variant_id])
            .map_err(from_rusqlite)?;

        let ts = now();
        let mut written = Vec::with_capacity(prepared.len());
        for PreparedSection {
            section_type,
            content,
            order,
            enabled,
        } in prepared
        {
            let section = ContentSection {
                id: uuid::Uuid::now_v7().to_string(),
                variant_id: variant_id.to_string(),
                section_type: section_type.as_str().to_string(),
                content,
                order,
                enabled,
                created_at: ts,
                updated_at: ts,
            };
            insert(conn, &section)?;
            written.push(section);
        }

        tracing::debug!(variant_id, section_count = written.len(), "sections replaced");
        Ok(written)
    }
}

fn insert(conn: &Connection, section: &ContentSection) -> Result<()> {
    conn.execute(
        "INSERT INTO content_sections (id, variant_id, section_type, content, sort_order, enabled, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            section.id,
            section.variant_id,
            section.section_type,
            section.content,
            section.order,
            section.enabled,
            to_millis(section.created_at),
            to_millis(section.updated_at),
        ],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

fn next_order(conn: &Connection, variant_id: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(sort_order), 0) + 1 FROM content_sections WHERE variant_id = ?1",
        [variant_id],
        |row| row.get(0),
    )
    .map_err(from_rusqlite)
}

fn ensure_variant(conn: &Connection, op: &str, variant_id: &str) -> Result<()> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM variants WHERE id = ?1)",
            [variant_id],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;
    if exists {
        Ok(())
    } else {
        Err(not_found(op, variant_id, "Variant"))
    }
}
