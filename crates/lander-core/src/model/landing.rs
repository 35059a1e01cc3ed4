//! Landing page read-model assembled per request

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::header::HeaderConfig;
use super::section::ContentSection;

/// Resolved variant as exposed to the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub axes: BTreeMap<String, String>,
}

/// Section as rendered by the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub section_type: String,
    pub content: serde_json::Value,
    pub order: i64,
    pub enabled: bool,
}

impl LandingSection {
    pub fn is_hero(&self) -> bool {
        self.section_type.trim().eq_ignore_ascii_case("hero")
    }
}

impl From<ContentSection> for LandingSection {
    fn from(section: ContentSection) -> Self {
        Self {
            id: Some(section.id),
            section_type: section.section_type,
            content: section.content,
            order: section.order,
            enabled: section.enabled,
        }
    }
}

/// One purchasable plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_price_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_price_cents: Option<i64>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
}

/// Pricing catalog overview returned by the pricing provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOverview {
    pub currency: String,
    pub plans: Vec<PricingPlan>,
}

impl PricingOverview {
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Downloadable application entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadApp {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Site branding, merged best-effort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    pub site_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
}

/// Complete page configuration
///
/// `fallback` is true when the baked-in offline payload was substituted for
/// live resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingConfigResponse {
    pub variant: VariantSummary,
    pub sections: Vec<LandingSection>,
    pub pricing: PricingOverview,
    pub downloads: Vec<DownloadApp>,
    pub header: HeaderConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
    pub fallback: bool,
}

impl LandingConfigResponse {
    pub fn has_hero(&self) -> bool {
        self.sections.iter().any(LandingSection::is_hero)
    }
}
