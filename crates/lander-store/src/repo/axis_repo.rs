//! Axis catalog queries

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use lander_core::model::{AxisCatalog, AxisDefinition};
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Read access to the known axis/value space
pub struct AxisRepo;

impl AxisRepo {
    /// Load the full catalog
    pub fn catalog(conn: &Connection) -> Result<AxisCatalog> {
        let mut stmt = conn
            .prepare(
                "SELECT a.id, a.label, v.value
                 FROM axes a
                 LEFT JOIN axis_values v ON v.axis_id = a.id
                 ORDER BY a.position ASC, v.position ASC",
            )
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        let mut definitions: BTreeMap<String, AxisDefinition> = BTreeMap::new();
        for (id, label, value) in rows {
            let definition = definitions
                .entry(id.clone())
                .or_insert_with(|| AxisDefinition {
                    id,
                    label,
                    values: Default::default(),
                });
            if let Some(value) = value {
                definition.values.insert(value);
            }
        }

        Ok(AxisCatalog::new(definitions.into_values()))
    }
}
