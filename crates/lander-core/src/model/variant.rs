use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::header::HeaderConfig;
use super::landing::VariantSummary;
use crate::errors::RuleViolation;

/// Lifecycle status of a variant
///
/// Transitions only move forward: active → archived → deleted. Reactivation
/// of an archived variant happens through snapshot import; resurrection of a
/// deleted one requires an explicit policy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantStatus {
    Active,
    Archived,
    Deleted,
}

impl VariantStatus {
    /// Stable storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantStatus::Active => "active",
            VariantStatus::Archived => "archived",
            VariantStatus::Deleted => "deleted",
        }
    }

    /// Parse a status string (trimmed, case-insensitive)
    ///
    /// # Errors
    /// Returns `UnknownStatus` for anything outside active/archived/deleted.
    pub fn parse(value: &str) -> Result<Self, RuleViolation> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(VariantStatus::Active),
            "archived" => Ok(VariantStatus::Archived),
            "deleted" => Ok(VariantStatus::Deleted),
            _ => Err(RuleViolation::UnknownStatus {
                status: value.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for VariantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured presentation of the landing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Unique, URL-safe identifier used by routes and snapshot files
    pub slug: String,

    pub name: String,

    pub description: Option<String>,

    /// Selection probability mass, always within [0, 100]
    pub weight: i64,

    pub status: VariantStatus,

    /// Axis identifier → selected value. Opaque targeting metadata.
    pub axes: BTreeMap<String, String>,

    /// Normalized header presentation
    pub header_config: HeaderConfig,

    /// Opaque SEO document
    pub seo_config: serde_json::Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Variant {
    pub fn is_active(&self) -> bool {
        self.status == VariantStatus::Active
    }

    pub fn is_deleted(&self) -> bool {
        self.status == VariantStatus::Deleted
    }

    /// Summary carried in the landing response
    pub fn summary(&self) -> VariantSummary {
        VariantSummary {
            id: Some(self.id.clone()),
            slug: self.slug.clone(),
            name: self.name.clone(),
            axes: self.axes.clone(),
        }
    }
}

/// Input for creating a variant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewVariant {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub weight: i64,
    pub axes: BTreeMap<String, String>,
}

/// Partial update of a variant; `None` leaves the field untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VariantPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub weight: Option<i64>,
    /// Full replacement of the axis set when supplied
    #[serde(default)]
    pub axes: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub header_config: Option<HeaderConfig>,
    #[serde(default)]
    pub seo_config: Option<serde_json::Value>,
}

impl VariantPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.weight.is_none()
            && self.axes.is_none()
            && self.header_config.is_none()
            && self.seo_config.is_none()
    }
}
