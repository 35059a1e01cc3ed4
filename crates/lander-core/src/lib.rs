//! Lander Core - landing page variant domain kernel
//!
//! This crate provides the foundational data structures and pure operations for
//! resolving which landing page variant a visitor sees:
//! - Variant, ContentSection and VariantSnapshot models
//! - The landing read-model and its pricing/download/branding parts
//! - Validation rules for weights, axes, statuses, slugs and section types
//! - Weighted random variant selection
//! - Header normalization and fallback payload parsing
//! - Error facility, logging facility and the observability collaborator

pub mod errors;
pub mod fallback;
pub mod logging_facility;
pub mod model;
pub mod observability;
pub mod rules;
pub mod selection;

#[doc(hidden)]
pub use lander_core_types::schema as __schema;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, RuleViolation};
pub use fallback::FallbackPayload;
pub use model::{
    AxisCatalog, ContentSection, HeaderConfig, LandingConfigResponse, SectionInput, SectionType,
    Variant, VariantSnapshot, VariantStatus,
};
pub use observability::{Observer, RecordingObserver, TracingObserver};
