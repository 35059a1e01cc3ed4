//! Weighted random variant selection
//!
//! Draws a uniform integer in `[0, total)` and walks the candidates
//! accumulating weight; the first variant whose cumulative weight exceeds the
//! draw wins. When every active weight is zero the choice is uniform.

use rand::Rng;

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::Variant;

/// Pick one active variant from `candidates`
///
/// Non-active entries are ignored. The caller owns the random source so that a
/// single process-lifetime generator can serve every draw.
///
/// # Errors
/// `NoActiveVariants` when no candidate is active.
pub fn select_weighted<'a, R>(candidates: &'a [Variant], rng: &mut R) -> Result<&'a Variant>
where
    R: Rng + ?Sized,
{
    let active: Vec<&Variant> = candidates.iter().filter(|v| v.is_active()).collect();
    if active.is_empty() {
        return Err(ExError::new(ExErrorKind::NoActiveVariants)
            .with_op("select_variant")
            .with_message("No active variants to select from"));
    }

    let total: i64 = active.iter().map(|v| v.weight.max(0)).sum();
    if total == 0 {
        return Ok(active[rng.gen_range(0..active.len())]);
    }

    let draw = rng.gen_range(0..total);
    let mut cumulative = 0i64;
    for variant in &active {
        cumulative += variant.weight.max(0);
        if cumulative > draw {
            return Ok(variant);
        }
    }

    // Unreachable while draw < total; keep a deterministic answer regardless
    Ok(active[active.len() - 1])
}
