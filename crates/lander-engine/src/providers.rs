//! Provider boundary for load-bearing and best-effort page data
//!
//! Pricing and downloads are required for a live page; branding is optional.
//! [`StaticCatalog`] serves all three from a JSON document and backs the CLI
//! preview and the tests.

#![allow(clippy::result_large_err)]

use lander_core::errors::{ExError, ExErrorKind, Result};
use lander_core::model::{Branding, DownloadApp, PricingOverview};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub trait PricingProvider: Send + Sync {
    /// # Errors
    /// Any error makes the aggregator serve the fallback payload.
    fn overview(&self) -> Result<PricingOverview>;
}

pub trait DownloadProvider: Send + Sync {
    /// # Errors
    /// Any error makes the aggregator serve the fallback payload.
    fn list_apps(&self, bundle_key: &str) -> Result<Vec<DownloadApp>>;
}

pub trait BrandingProvider: Send + Sync {
    /// # Errors
    /// Errors are logged and the response goes out without branding.
    fn get(&self) -> Result<Branding>;
}

/// Provider data read from a JSON catalog file
///
/// ```json
/// {
///   "pricing": {"currency": "USD", "plans": [...]},
///   "downloads": {"default": [...]},
///   "branding": {"site_name": "Lander"}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub pricing: Option<PricingOverview>,
    /// Apps keyed by bundle
    #[serde(default)]
    pub downloads: BTreeMap<String, Vec<DownloadApp>>,
    #[serde(default)]
    pub branding: Option<Branding>,
}

impl StaticCatalog {
    /// Parse a catalog document
    ///
    /// # Errors
    /// `ConfigParse` when the JSON does not match the catalog shape.
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| {
            ExError::new(ExErrorKind::ConfigParse)
                .with_op("catalog_parse")
                .with_message(format!("Provider catalog is not valid: {}", e))
        })
    }

    /// Read and parse a catalog file
    ///
    /// # Errors
    /// `Io` when the file cannot be read, `ConfigParse` when it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("catalog_load")
                .with_entity_id(path.display().to_string())
                .with_message(e.to_string())
        })?;
        Self::parse(&raw).map_err(|e| e.with_entity_id(path.display().to_string()))
    }
}

fn unavailable(op: &str, what: &str) -> ExError {
    ExError::new(ExErrorKind::ExternalService)
        .with_op(op.to_string())
        .with_message(format!("{} unavailable", what))
}

impl PricingProvider for StaticCatalog {
    fn overview(&self) -> Result<PricingOverview> {
        self.pricing
            .clone()
            .ok_or_else(|| unavailable("pricing_overview", "Pricing"))
    }
}

impl DownloadProvider for StaticCatalog {
    fn list_apps(&self, bundle_key: &str) -> Result<Vec<DownloadApp>> {
        self.downloads
            .get(bundle_key)
            .cloned()
            .ok_or_else(|| {
                unavailable("list_apps", "Download bundle").with_entity_id(bundle_key.to_string())
            })
    }
}

impl BrandingProvider for StaticCatalog {
    fn get(&self) -> Result<Branding> {
        self.branding
            .clone()
            .ok_or_else(|| unavailable("branding_get", "Branding"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "pricing": {"currency": "USD", "plans": [{"id": "free", "name": "Free"}]},
        "downloads": {"desktop": [{"id": "mac", "name": "Lander", "platform": "macos", "url": "https://x/mac"}]}
    }"#;

    #[test]
    fn test_catalog_serves_what_it_has() {
        let catalog = StaticCatalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.overview().unwrap().currency, "USD");
        assert_eq!(catalog.list_apps("desktop").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_parts_are_external_service_errors() {
        let catalog = StaticCatalog::parse(CATALOG).unwrap();
        let err = catalog.list_apps("mobile").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ExternalService);
        assert_eq!(err.entity_id(), Some("mobile"));
        assert!(BrandingProvider::get(&catalog).is_err());

        let empty = StaticCatalog::default();
        assert!(empty.overview().is_err());
    }

    #[test]
    fn test_malformed_catalog() {
        let err = StaticCatalog::parse(r#"{"pricing": 3}"#).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ConfigParse);
    }
}
