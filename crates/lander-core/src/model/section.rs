use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Allowed content section vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Hero,
    Features,
    Pricing,
    Cta,
    Testimonials,
    Faq,
    Footer,
    Video,
    Downloads,
}

impl SectionType {
    pub const ALL: [SectionType; 9] = [
        SectionType::Hero,
        SectionType::Features,
        SectionType::Pricing,
        SectionType::Cta,
        SectionType::Testimonials,
        SectionType::Faq,
        SectionType::Footer,
        SectionType::Video,
        SectionType::Downloads,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Hero => "hero",
            SectionType::Features => "features",
            SectionType::Pricing => "pricing",
            SectionType::Cta => "cta",
            SectionType::Testimonials => "testimonials",
            SectionType::Faq => "faq",
            SectionType::Footer => "footer",
            SectionType::Video => "video",
            SectionType::Downloads => "downloads",
        }
    }

    /// Look up a vocabulary entry (trimmed, case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ordered, independently toggleable content block of a variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Owning variant
    pub variant_id: String,

    pub section_type: String,

    /// Section document, opaque to this crate and owned by the renderer
    pub content: serde_json::Value,

    /// Display order; ties fall back to insertion order
    pub order: i64,

    /// Public visibility gate
    pub enabled: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentSection {
    pub fn is_hero(&self) -> bool {
        self.section_type
            .trim()
            .eq_ignore_ascii_case(SectionType::Hero.as_str())
    }

    /// Input form used by snapshot export, carrying explicit order and flag
    pub fn to_input(&self) -> SectionInput {
        SectionInput {
            section_type: self.section_type.clone(),
            content: self.content.clone(),
            order: self.order,
            enabled: Some(self.enabled),
        }
    }
}

/// Section as supplied by snapshots, imports and sync files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionInput {
    #[serde(alias = "type")]
    pub section_type: String,

    /// Missing content deserializes as null and is rejected on write
    #[serde(default)]
    pub content: serde_json::Value,

    /// Values <= 0 are renumbered to their 1-based position
    #[serde(default)]
    pub order: i64,

    /// Defaults to true when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Ad-hoc single section create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSection {
    pub variant_id: String,
    pub section_type: String,
    pub content: serde_json::Value,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A validated section ready for insertion with its final order
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSection {
    pub section_type: SectionType,
    pub content: serde_json::Value,
    pub order: i64,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_type_parse() {
        assert_eq!(SectionType::parse("hero"), Some(SectionType::Hero));
        assert_eq!(SectionType::parse(" FAQ "), Some(SectionType::Faq));
        assert_eq!(SectionType::parse("carousel"), None);
        assert_eq!(SectionType::parse(""), None);
    }

    #[test]
    fn test_section_input_defaults() {
        let input: SectionInput = serde_json::from_value(json!({"type": "cta"})).unwrap();
        assert_eq!(input.section_type, "cta");
        assert!(input.content.is_null());
        assert_eq!(input.order, 0);
        assert_eq!(input.enabled, None);
    }

    #[test]
    fn test_is_hero_case_insensitive() {
        let now = Utc::now();
        let section = ContentSection {
            id: "s1".to_string(),
            variant_id: "v1".to_string(),
            section_type: "Hero".to_string(),
            content: json!({}),
            order: 1,
            enabled: true,
            created_at: now,
            updated_at: now,
        };
        assert!(section.is_hero());
    }
}
