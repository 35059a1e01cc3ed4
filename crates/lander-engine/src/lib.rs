//! Lander Engine - Orchestration layer
//!
//! Provides the landing aggregator (fallback engine), the provider boundary,
//! the process-lifetime variant selector, settings loading and the
//! boundary-logged administrative commands over the store.

pub mod commands;
pub mod fallback_source;
pub mod providers;
pub mod selector;
pub mod settings;

pub use commands::LandingAggregator;
pub use fallback_source::{FallbackProvider, StaticFallback};
pub use providers::{BrandingProvider, DownloadProvider, PricingProvider, StaticCatalog};
pub use selector::VariantSelector;
pub use settings::Settings;
