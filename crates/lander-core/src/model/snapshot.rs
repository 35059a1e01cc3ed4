//! Snapshot value objects used for export, import and directory sync

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::header::HeaderConfig;
use super::section::{ContentSection, SectionInput};
use super::variant::Variant;

/// Variant metadata as carried by a snapshot document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotVariant {
    /// May be empty in sync files, where the file stem supplies it
    #[serde(default)]
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub weight: i64,
    /// Defaults to "active" on import
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub axes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<serde_json::Value>,
}

/// One variant's metadata plus its ordered section list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSnapshot {
    pub variant: SnapshotVariant,
    #[serde(default)]
    pub sections: Vec<SectionInput>,
}

impl VariantSnapshot {
    /// Compose a snapshot from stored state (all sections, not just public)
    pub fn from_parts(variant: &Variant, sections: &[ContentSection]) -> Self {
        Self {
            variant: SnapshotVariant {
                slug: variant.slug.clone(),
                name: variant.name.clone(),
                description: variant.description.clone(),
                weight: variant.weight,
                status: Some(variant.status.as_str().to_string()),
                axes: variant.axes.clone(),
                header: Some(variant.header_config.clone()),
                seo: Some(variant.seo_config.clone()),
            },
            sections: sections.iter().map(ContentSection::to_input).collect(),
        }
    }
}
