//! Pure validation rules applied before any write touches storage

pub mod sections;
pub mod validation;

pub use sections::{prepare_sections, validate_section_input};
pub use validation::{
    resolve_status, validate_axes, validate_name, validate_new_variant, validate_patch,
    validate_slug, validate_snapshot_slug, validate_weight,
};
