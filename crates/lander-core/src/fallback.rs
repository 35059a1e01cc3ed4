//! Baked-in offline landing configuration
//!
//! The payload is parsed once at startup and never mutated afterwards. Every
//! substitution hands out a deep copy flagged `fallback = true`.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{
    DownloadApp, HeaderConfig, LandingConfigResponse, LandingSection, PricingOverview,
    VariantSummary,
};

/// Compiled-in default document, used when no on-disk payload loads
pub const COMPILED_DEFAULT: &str = include_str!("../assets/fallback_landing.json");

/// Slug shown to clients when the payload's own slug is blank or "control"
pub const FALLBACK_SLUG: &str = "fallback";

#[derive(Debug, Deserialize)]
struct FallbackDocument {
    variant: FallbackVariantDoc,
    #[serde(default)]
    sections: Vec<FallbackSectionDoc>,
    #[serde(default)]
    axes: BTreeMap<String, String>,
    #[serde(default)]
    pricing: Option<serde_json::Value>,
    #[serde(default)]
    downloads: Vec<DownloadApp>,
    #[serde(default)]
    header: Option<HeaderConfig>,
}

#[derive(Debug, Deserialize)]
struct FallbackVariantDoc {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct FallbackSectionDoc {
    #[serde(default, alias = "type")]
    section_type: String,
    #[serde(default)]
    content: serde_json::Value,
    #[serde(default)]
    order: Option<i64>,
    #[serde(default)]
    enabled: Option<bool>,
}

/// Parsed, normalized fallback landing configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPayload {
    response: LandingConfigResponse,
}

impl FallbackPayload {
    /// Parse and normalize a fallback document
    ///
    /// Sections with a blank type are dropped, unset or non-positive orders
    /// become the 1-based position, `enabled` defaults to true and the list is
    /// sorted by order.
    ///
    /// # Errors
    /// `ConfigParse` when the JSON is malformed, the variant slug is empty, or
    /// the pricing document is missing, malformed or has no plans.
    pub fn parse(raw: &str) -> Result<Self> {
        let doc: FallbackDocument = serde_json::from_str(raw).map_err(|e| {
            config_parse(format!("Fallback document is not valid JSON: {}", e))
        })?;

        let slug = doc.variant.slug.trim().to_string();
        if slug.is_empty() {
            return Err(config_parse("Fallback document has an empty variant slug").with_field("variant.slug"));
        }

        let pricing_value = doc
            .pricing
            .filter(|v| !v.is_null())
            .ok_or_else(|| config_parse("Fallback document has no pricing").with_field("pricing"))?;
        let pricing: PricingOverview = serde_json::from_value(pricing_value).map_err(|e| {
            config_parse(format!("Fallback pricing is malformed: {}", e)).with_field("pricing")
        })?;
        if pricing.is_empty() {
            return Err(config_parse("Fallback pricing has no plans").with_field("pricing.plans"));
        }

        let name = match doc.variant.name.trim() {
            "" => slug.clone(),
            n => n.to_string(),
        };
        let header = HeaderConfig::normalize_or_default(doc.header.as_ref(), &name);

        Ok(Self {
            response: LandingConfigResponse {
                variant: VariantSummary {
                    id: doc.variant.id,
                    slug,
                    name,
                    axes: doc.axes,
                },
                sections: normalize_sections(doc.sections),
                pricing,
                downloads: doc.downloads,
                header,
                branding: None,
                fallback: true,
            },
        })
    }

    /// Parse the compiled-in default document
    ///
    /// # Errors
    /// `ConfigParse` if the embedded asset is itself invalid, which is fatal
    /// to process initialization.
    pub fn compiled_default() -> Result<Self> {
        Self::parse(COMPILED_DEFAULT).map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("fallback_compiled_default")
                .with_message("Compiled-in fallback payload failed to parse")
                .with_source(e)
        })
    }

    /// Slug as written in the document
    pub fn slug(&self) -> &str {
        &self.response.variant.slug
    }

    /// Deep copy served to clients
    pub fn to_response(&self) -> LandingConfigResponse {
        let mut response = self.response.clone();
        response.fallback = true;
        let slug = response.variant.slug.trim();
        if slug.is_empty() || slug.eq_ignore_ascii_case("control") {
            response.variant.slug = FALLBACK_SLUG.to_string();
        }
        response
    }
}

fn normalize_sections(docs: Vec<FallbackSectionDoc>) -> Vec<LandingSection> {
    let mut sections: Vec<LandingSection> = docs
        .into_iter()
        .filter(|d| !d.section_type.trim().is_empty())
        .enumerate()
        .map(|(position, doc)| LandingSection {
            id: None,
            section_type: doc.section_type.trim().to_string(),
            content: doc.content,
            order: match doc.order {
                Some(order) if order > 0 => order,
                _ => position as i64 + 1,
            },
            enabled: doc.enabled.unwrap_or(true),
        })
        .collect();
    sections.sort_by_key(|s| s.order);
    sections
}

fn config_parse(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::ConfigParse)
        .with_op("fallback_parse")
        .with_message(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICING: &str = r#"{"currency": "EUR", "plans": [{"id": "p", "name": "P"}]}"#;

    #[test]
    fn test_compiled_default_parses_and_is_renderable() {
        let payload = FallbackPayload::compiled_default().unwrap();
        let response = payload.to_response();
        assert!(response.fallback);
        assert!(response.has_hero());
        assert!(!response.pricing.is_empty());
        assert_eq!(response.variant.slug, FALLBACK_SLUG);
    }

    #[test]
    fn test_sections_normalized_and_sorted() {
        let raw = format!(
            r#"{{
                "variant": {{"slug": "offline", "name": "Offline"}},
                "sections": [
                    {{"type": "footer", "content": {{}}, "order": 10}},
                    {{"type": "", "content": {{}}}},
                    {{"type": "hero", "content": {{}}, "order": 0}},
                    {{"type": "cta", "content": {{}}, "enabled": false}}
                ],
                "pricing": {}
            }}"#,
            PRICING
        );
        let payload = FallbackPayload::parse(&raw).unwrap();
        let response = payload.to_response();

        let got: Vec<(&str, i64, bool)> = response
            .sections
            .iter()
            .map(|s| (s.section_type.as_str(), s.order, s.enabled))
            .collect();
        assert_eq!(
            got,
            vec![("hero", 2, true), ("cta", 3, false), ("footer", 10, true)]
        );
        assert_eq!(response.variant.slug, "offline");
    }

    #[test]
    fn test_requires_slug() {
        let raw = format!(r#"{{"variant": {{"slug": " "}}, "pricing": {}}}"#, PRICING);
        let err = FallbackPayload::parse(&raw).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ConfigParse);
        assert_eq!(err.field(), Some("variant.slug"));
    }

    #[test]
    fn test_requires_non_empty_pricing() {
        let missing = r#"{"variant": {"slug": "x"}}"#;
        assert_eq!(
            FallbackPayload::parse(missing).unwrap_err().kind(),
            ExErrorKind::ConfigParse
        );

        let empty = r#"{"variant": {"slug": "x"}, "pricing": {"currency": "USD", "plans": []}}"#;
        assert_eq!(
            FallbackPayload::parse(empty).unwrap_err().field(),
            Some("pricing.plans")
        );

        let malformed = r#"{"variant": {"slug": "x"}, "pricing": {"plans": "nope"}}"#;
        assert_eq!(
            FallbackPayload::parse(malformed).unwrap_err().field(),
            Some("pricing")
        );
    }

    #[test]
    fn test_invalid_json_is_config_parse() {
        let err = FallbackPayload::parse("{not json").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ConfigParse);
    }

    #[test]
    fn test_control_slug_rewritten_but_custom_slug_kept() {
        let control = format!(r#"{{"variant": {{"slug": "Control"}}, "pricing": {}}}"#, PRICING);
        let payload = FallbackPayload::parse(&control).unwrap();
        assert_eq!(payload.slug(), "Control");
        assert_eq!(payload.to_response().variant.slug, FALLBACK_SLUG);

        let custom = format!(r#"{{"variant": {{"slug": "offline-v2"}}, "pricing": {}}}"#, PRICING);
        let payload = FallbackPayload::parse(&custom).unwrap();
        assert_eq!(payload.to_response().variant.slug, "offline-v2");
    }

    #[test]
    fn test_each_response_is_an_independent_copy() {
        let payload = FallbackPayload::compiled_default().unwrap();
        let mut first = payload.to_response();
        first.sections.clear();
        let second = payload.to_response();
        assert!(!second.sections.is_empty());
    }
}
