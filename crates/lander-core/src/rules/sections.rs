//! Preparation of a full section replacement
//!
//! Validation of every input happens before any ordering work so that a
//! rejected batch never reaches storage.

use crate::errors::RuleViolation;
use crate::model::{PreparedSection, SectionInput, SectionType};

/// Validate one section input against the allowed vocabulary
pub fn validate_section_input(
    index: usize,
    input: &SectionInput,
) -> Result<SectionType, RuleViolation> {
    let trimmed = input.section_type.trim();
    if trimmed.is_empty() {
        return Err(RuleViolation::EmptySectionType { index });
    }
    let section_type =
        SectionType::parse(trimmed).ok_or_else(|| RuleViolation::UnsupportedSectionType {
            index,
            section_type: trimmed.to_string(),
        })?;
    if input.content.is_null() {
        return Err(RuleViolation::MissingSectionContent {
            index,
            section_type: trimmed.to_string(),
        });
    }
    Ok(section_type)
}

/// Validate, order and number a replacement section list
///
/// 1. Every input is validated; the first violation aborts.
/// 2. Inputs are sorted stably by supplied order.
/// 3. Orders <= 0 become the 1-based position in the sorted list; positive
///    orders are kept verbatim.
/// 4. `enabled` defaults to true.
pub fn prepare_sections(inputs: &[SectionInput]) -> Result<Vec<PreparedSection>, RuleViolation> {
    let mut validated = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        validated.push((validate_section_input(index, input)?, input));
    }

    // sort_by_key is stable: equal orders keep input order
    validated.sort_by_key(|(_, input)| input.order);

    Ok(validated
        .into_iter()
        .enumerate()
        .map(|(position, (section_type, input))| PreparedSection {
            section_type,
            content: input.content.clone(),
            order: if input.order <= 0 {
                position as i64 + 1
            } else {
                input.order
            },
            enabled: input.enabled.unwrap_or(true),
        })
        .collect())
}
