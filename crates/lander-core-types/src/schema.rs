//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_VARIANT_ID: &str = "variant_id";
pub const FIELD_VARIANT_SLUG: &str = "slug";

// Fallback / degradation context
pub const FIELD_REASON: &str = "reason";
pub const FIELD_ERROR: &str = "error";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Observer event names
pub const EVENT_LANDING_FALLBACK: &str = "landing.fallback";
pub const EVENT_BRANDING_UNAVAILABLE: &str = "landing.branding_unavailable";
pub const EVENT_FALLBACK_FILE_REJECTED: &str = "landing.fallback_file_rejected";
pub const EVENT_SECTION_COPY_FAILED: &str = "variant.section_copy_failed";
pub const EVENT_SYNC_APPLIED: &str = "sync.applied";

// Fallback reason codes
pub const REASON_PRICING_UNAVAILABLE: &str = "pricing_unavailable";
pub const REASON_DOWNLOADS_UNAVAILABLE: &str = "downloads_unavailable";
pub const REASON_SLUG_LOOKUP_FAILED: &str = "variant_slug_lookup_failed";
pub const REASON_SELECTION_FAILED: &str = "variant_selection_failed";
pub const REASON_SECTIONS_UNAVAILABLE: &str = "sections_unavailable";
pub const REASON_NO_SECTIONS: &str = "no_sections";
pub const REASON_MISSING_HERO: &str = "missing_hero";
