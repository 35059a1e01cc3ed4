//! Landing Aggregator
//!
//! Assembles the public page configuration. The caller always gets a response:
//! every failure on the way turns into the fallback payload plus an observer
//! event carrying a stable reason code.
//!
//! Resolution order:
//! 1. pricing and downloads (load-bearing)
//! 2. variant by slug, or weighted selection when no slug is given
//! 3. enabled sections of that variant
//! 4. renderability: at least one section and a hero
//! 5. branding, best-effort, on live and fallback responses alike

use crate::fallback_source::FallbackProvider;
use crate::providers::{BrandingProvider, DownloadProvider, PricingProvider};
use crate::selector::VariantSelector;
use lander_core::errors::{ExError, ExErrorKind};
use lander_core::model::{Branding, LandingConfigResponse, LandingSection, VariantStatus};
use lander_core::observability::{Observer, TracingObserver};
use lander_core::{log_op_end, log_op_start};
use lander_core_types::schema::{
    EVENT_BRANDING_UNAVAILABLE, EVENT_LANDING_FALLBACK, FIELD_ERROR, FIELD_REASON,
    FIELD_REQUEST_ID, FIELD_VARIANT_SLUG, REASON_DOWNLOADS_UNAVAILABLE, REASON_MISSING_HERO,
    REASON_NO_SECTIONS, REASON_PRICING_UNAVAILABLE, REASON_SECTIONS_UNAVAILABLE,
    REASON_SELECTION_FAILED, REASON_SLUG_LOOKUP_FAILED,
};
use lander_core_types::RequestId;
use lander_store::repo::{SectionRepo, VariantRepo};
use rusqlite::Connection;
use std::sync::Arc;
use std::time::Instant;

/// Bundle requested from the download provider unless configured otherwise
pub const DEFAULT_BUNDLE_KEY: &str = "default";

/// Why live resolution was abandoned
#[derive(Debug, Clone)]
struct Degraded {
    reason: &'static str,
    slug: String,
    error: Option<String>,
}

impl Degraded {
    fn new(reason: &'static str, slug: &str) -> Self {
        Self {
            reason,
            slug: slug.to_string(),
            error: None,
        }
    }

    fn caused_by(mut self, err: &ExError) -> Self {
        self.error = Some(err.to_string());
        self
    }
}

pub struct LandingAggregator {
    pricing: Arc<dyn PricingProvider>,
    downloads: Arc<dyn DownloadProvider>,
    branding: Option<Arc<dyn BrandingProvider>>,
    fallback: Arc<dyn FallbackProvider>,
    selector: Arc<VariantSelector>,
    observer: Arc<dyn Observer>,
    bundle_key: String,
}

impl LandingAggregator {
    pub fn new(
        pricing: Arc<dyn PricingProvider>,
        downloads: Arc<dyn DownloadProvider>,
        fallback: Arc<dyn FallbackProvider>,
    ) -> Self {
        Self {
            pricing,
            downloads,
            branding: None,
            fallback,
            selector: Arc::new(VariantSelector::from_entropy()),
            observer: Arc::new(TracingObserver),
            bundle_key: DEFAULT_BUNDLE_KEY.to_string(),
        }
    }

    pub fn with_branding(mut self, branding: Arc<dyn BrandingProvider>) -> Self {
        self.branding = Some(branding);
        self
    }

    pub fn with_selector(mut self, selector: Arc<VariantSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_bundle_key(mut self, bundle_key: impl Into<String>) -> Self {
        self.bundle_key = bundle_key.into();
        self
    }

    /// Resolve the page for `slug`, or for a weighted pick when `slug` is
    /// absent or blank
    ///
    /// Never fails; `fallback` on the response tells whether the offline
    /// payload was served.
    pub fn landing_config(&self, conn: &Connection, slug: Option<&str>) -> LandingConfigResponse {
        let request_id = RequestId::new();
        let slug = slug.map(str::trim).filter(|s| !s.is_empty());
        log_op_start!(
            "landing_config",
            request_id = request_id.as_str(),
            slug = slug.unwrap_or_default()
        );
        let start = Instant::now();

        let response = match self.resolve(conn, slug) {
            Ok(live) => live,
            Err(degraded) => self.degrade(degraded, &request_id),
        };
        let response = self.merge_branding(response, &request_id);

        log_op_end!(
            "landing_config",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = request_id.as_str(),
            fallback = response.fallback,
            served_slug = response.variant.slug.as_str()
        );
        response
    }

    fn resolve(
        &self,
        conn: &Connection,
        slug: Option<&str>,
    ) -> Result<LandingConfigResponse, Degraded> {
        let attempted = slug.unwrap_or_default();

        let pricing = self
            .pricing
            .overview()
            .map_err(|e| Degraded::new(REASON_PRICING_UNAVAILABLE, attempted).caused_by(&e))?;
        let downloads = self
            .downloads
            .list_apps(&self.bundle_key)
            .map_err(|e| Degraded::new(REASON_DOWNLOADS_UNAVAILABLE, attempted).caused_by(&e))?;

        let variant = match slug {
            Some(slug) => VariantRepo::get_by_slug(conn, slug)
                .and_then(|v| match v.status {
                    VariantStatus::Deleted => Err(ExError::new(ExErrorKind::NotFound)
                        .with_op("landing_config")
                        .with_entity_id(slug)
                        .with_message("Variant is deleted")),
                    _ => Ok(v),
                })
                .map_err(|e| Degraded::new(REASON_SLUG_LOOKUP_FAILED, slug).caused_by(&e))?,
            None => self
                .selector
                .select(conn)
                .map_err(|e| Degraded::new(REASON_SELECTION_FAILED, attempted).caused_by(&e))?,
        };

        let mut sections: Vec<LandingSection> = SectionRepo::list_public(conn, &variant.id)
            .map_err(|e| Degraded::new(REASON_SECTIONS_UNAVAILABLE, &variant.slug).caused_by(&e))?
            .into_iter()
            .map(LandingSection::from)
            .collect();
        sections.sort_by_key(|s| s.order);

        if sections.is_empty() {
            return Err(Degraded::new(REASON_NO_SECTIONS, &variant.slug));
        }
        if !sections.iter().any(LandingSection::is_hero) {
            return Err(Degraded::new(REASON_MISSING_HERO, &variant.slug));
        }

        Ok(LandingConfigResponse {
            variant: variant.summary(),
            sections,
            pricing,
            downloads,
            header: variant.header_config.clone(),
            branding: None,
            fallback: false,
        })
    }

    fn degrade(&self, degraded: Degraded, request_id: &RequestId) -> LandingConfigResponse {
        let mut fields = vec![
            (FIELD_REASON, degraded.reason.to_string()),
            (FIELD_VARIANT_SLUG, degraded.slug),
            (FIELD_REQUEST_ID, request_id.as_str().to_string()),
        ];
        if let Some(error) = degraded.error {
            fields.push((FIELD_ERROR, error));
        }
        self.observer.event(EVENT_LANDING_FALLBACK, &fields);
        self.fallback.payload()
    }

    fn merge_branding(
        &self,
        mut response: LandingConfigResponse,
        request_id: &RequestId,
    ) -> LandingConfigResponse {
        if let Some(branding) = self.fetch_branding(&response.variant.slug, request_id) {
            response.branding = Some(branding);
        }
        response
    }

    fn fetch_branding(&self, slug: &str, request_id: &RequestId) -> Option<Branding> {
        let provider = self.branding.as_ref()?;
        match provider.get() {
            Ok(branding) => Some(branding),
            Err(e) => {
                self.observer.event(
                    EVENT_BRANDING_UNAVAILABLE,
                    &[
                        (FIELD_VARIANT_SLUG, slug.to_string()),
                        (FIELD_ERROR, e.to_string()),
                        (FIELD_REQUEST_ID, request_id.as_str().to_string()),
                    ],
                );
                None
            }
        }
    }
}
