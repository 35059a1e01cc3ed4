use std::collections::BTreeMap;

use crate::errors::RuleViolation;
use crate::model::{AxisCatalog, NewVariant, VariantPatch, VariantStatus};

pub const MIN_WEIGHT: i64 = 0;
pub const MAX_WEIGHT: i64 = 100;

/// Weight must lie in the inclusive range [0, 100]
pub fn validate_weight(weight: i64) -> Result<(), RuleViolation> {
    if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
        return Err(RuleViolation::WeightOutOfRange { weight });
    }
    Ok(())
}

/// Slugs are non-empty lowercase ASCII alphanumerics and dashes
pub fn validate_slug(slug: &str) -> Result<(), RuleViolation> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(RuleViolation::InvalidSlug {
            slug: slug.to_string(),
        });
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), RuleViolation> {
    if name.trim().is_empty() {
        return Err(RuleViolation::EmptyName);
    }
    Ok(())
}

/// Axes must be non-empty and every selection must exist in the catalog
pub fn validate_axes(
    axes: &BTreeMap<String, String>,
    catalog: &AxisCatalog,
) -> Result<(), RuleViolation> {
    if axes.is_empty() {
        return Err(RuleViolation::EmptyAxes);
    }
    for (axis, value) in axes {
        catalog.check(axis, value)?;
    }
    Ok(())
}

/// Resolve an optional status string, defaulting to active
pub fn resolve_status(status: Option<&str>) -> Result<VariantStatus, RuleViolation> {
    match status.map(str::trim) {
        None | Some("") => Ok(VariantStatus::Active),
        Some(s) => VariantStatus::parse(s),
    }
}

/// A snapshot may only be applied to the variant it names
pub fn validate_snapshot_slug(route: &str, payload: &str) -> Result<(), RuleViolation> {
    if route != payload {
        return Err(RuleViolation::SlugMismatch {
            route: route.to_string(),
            payload: payload.to_string(),
        });
    }
    Ok(())
}

pub fn validate_new_variant(
    input: &NewVariant,
    catalog: &AxisCatalog,
) -> Result<(), RuleViolation> {
    validate_slug(&input.slug)?;
    validate_name(&input.name)?;
    validate_weight(input.weight)?;
    validate_axes(&input.axes, catalog)
}

pub fn validate_patch(patch: &VariantPatch, catalog: &AxisCatalog) -> Result<(), RuleViolation> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    if let Some(weight) = patch.weight {
        validate_weight(weight)?;
    }
    if let Some(axes) = &patch.axes {
        validate_axes(axes, catalog)?;
    }
    Ok(())
}
