//! Header navigation/branding presentation and its defaulting pass

use serde::{Deserialize, Serialize};

/// A header navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    #[serde(default)]
    pub external: bool,
}

impl NavLink {
    fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
            external: false,
        }
    }

    fn trimmed(&self) -> Option<Self> {
        let label = self.label.trim();
        let href = self.href.trim();
        if label.is_empty() || href.is_empty() {
            return None;
        }
        Some(Self {
            label: label.to_string(),
            href: href.to_string(),
            external: self.external,
        })
    }
}

/// Structured header configuration of a variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderConfig {
    #[serde(default)]
    pub brand_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub nav_links: Vec<NavLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<NavLink>,
    #[serde(default = "default_sticky")]
    pub sticky: bool,
}

fn default_sticky() -> bool {
    true
}

impl HeaderConfig {
    /// Header assigned to a freshly created variant
    pub fn default_for(name: &str) -> Self {
        Self {
            brand_label: name.trim().to_string(),
            logo_url: None,
            nav_links: default_nav_links(),
            cta: Some(NavLink::new("Get started", "#pricing")),
            sticky: true,
        }
    }

    /// Fill gaps against the variant name and drop malformed links
    ///
    /// Idempotent: normalizing a normalized header returns it unchanged.
    pub fn normalize(&self, name: &str) -> Self {
        let brand_label = match self.brand_label.trim() {
            "" => name.trim().to_string(),
            label => label.to_string(),
        };

        let mut nav_links: Vec<NavLink> = Vec::with_capacity(self.nav_links.len());
        for link in self.nav_links.iter().filter_map(NavLink::trimmed) {
            if !nav_links.iter().any(|l| l.href == link.href) {
                nav_links.push(link);
            }
        }
        if nav_links.is_empty() {
            nav_links = default_nav_links();
        }

        let logo_url = self
            .logo_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Self {
            brand_label,
            logo_url,
            nav_links,
            cta: self.cta.as_ref().and_then(NavLink::trimmed),
            sticky: self.sticky,
        }
    }

    /// Normalize an optional header, defaulting when absent
    pub fn normalize_or_default(header: Option<&HeaderConfig>, name: &str) -> Self {
        match header {
            Some(h) => h.normalize(name),
            None => Self::default_for(name),
        }
    }
}

fn default_nav_links() -> Vec<NavLink> {
    vec![
        NavLink::new("Features", "#features"),
        NavLink::new("Pricing", "#pricing"),
        NavLink::new("Downloads", "#downloads"),
    ]
}
