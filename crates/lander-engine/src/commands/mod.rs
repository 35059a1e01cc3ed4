//! Command orchestration layer.
//!
//! Boundary-logged entry points that coordinate the core rules, the store and
//! the providers.

pub mod landing;
pub mod section;
pub mod snapshot;
pub mod sync;
pub mod variant;

pub use landing::LandingAggregator;
pub use variant::VariantCreated;
