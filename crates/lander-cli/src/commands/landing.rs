//! Landing configuration preview
//!
//! Resolves the public page the same way a request would, against a static
//! provider catalog, and prints the response as JSON.

use super::{open_db, print_json};
use clap::Args;
use lander_core::observability::TracingObserver;
use lander_engine::{LandingAggregator, Settings, StaticCatalog, StaticFallback, VariantSelector};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct LandingArgs {
    /// Variant to render; weighted selection when omitted
    #[arg(long)]
    pub slug: Option<String>,

    /// Provider catalog (pricing, downloads, branding), overriding settings
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Fixed seed for the weighted draw
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: LandingArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match args.catalog.as_ref().or(settings.catalog_path.as_ref()) {
        Some(path) => StaticCatalog::load(path)?,
        None => StaticCatalog::default(),
    };
    let catalog = Arc::new(catalog);
    let fallback = StaticFallback::load(settings.fallback_path.as_deref(), &TracingObserver)?;
    let selector = match args.seed {
        Some(seed) => VariantSelector::seeded(seed),
        None => VariantSelector::from_entropy(),
    };

    let aggregator = LandingAggregator::new(catalog.clone(), catalog.clone(), Arc::new(fallback))
        .with_branding(catalog)
        .with_selector(Arc::new(selector))
        .with_bundle_key(settings.download_bundle_key.as_str());

    let conn = open_db(settings)?;
    print_json(&aggregator.landing_config(&conn, args.slug.as_deref()))
}
