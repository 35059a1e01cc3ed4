//! Known axis/value space that variant axes must conform to

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::RuleViolation;

/// One targeting dimension and its allowed values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisDefinition {
    pub id: String,
    pub label: String,
    pub values: BTreeSet<String>,
}

/// Catalog of axes, keyed by axis identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisCatalog {
    axes: BTreeMap<String, AxisDefinition>,
}

impl AxisCatalog {
    pub fn new(definitions: impl IntoIterator<Item = AxisDefinition>) -> Self {
        Self {
            axes: definitions
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
        }
    }

    pub fn get(&self, axis: &str) -> Option<&AxisDefinition> {
        self.axes.get(axis)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &AxisDefinition> {
        self.axes.values()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Check one axis selection against the catalog
    ///
    /// # Errors
    /// `UnknownAxis` or `UnknownAxisValue`.
    pub fn check(&self, axis: &str, value: &str) -> Result<(), RuleViolation> {
        let definition = self.axes.get(axis).ok_or_else(|| RuleViolation::UnknownAxis {
            axis: axis.to_string(),
        })?;
        if !definition.values.contains(value) {
            return Err(RuleViolation::UnknownAxisValue {
                axis: axis.to_string(),
                value: value.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> AxisCatalog {
        AxisCatalog::new([AxisDefinition {
            id: "persona".to_string(),
            label: "Persona".to_string(),
            values: ["individual", "team"].iter().map(|s| s.to_string()).collect(),
        }])
    }

    #[test]
    fn test_check_known_value() {
        assert!(catalog().check("persona", "team").is_ok());
    }

    #[test]
    fn test_check_unknown_axis_and_value() {
        let catalog = catalog();
        assert!(matches!(
            catalog.check("tone", "bold"),
            Err(RuleViolation::UnknownAxis { .. })
        ));
        assert!(matches!(
            catalog.check("persona", "robot"),
            Err(RuleViolation::UnknownAxisValue { .. })
        ));
    }
}
