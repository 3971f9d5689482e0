//! Unit conversion: canonical-unit value to the definition's target unit.

use std::collections::BTreeMap;

use meas_model::{ConversionRule, RuleBundle};

use crate::error::TransformError;

/// A converted value together with the unit it is now expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub value: f64,
    pub unit: String,
}

/// Conversion rule lookup for one resolved bundle.
///
/// Rules are keyed by source canonical unit (case-insensitive). Lookup
/// failure is an explicit error; a unit without a rule never falls back to an
/// identity conversion.
pub struct UnitConverter {
    rules: BTreeMap<String, ConversionRule>,
}

impl UnitConverter {
    pub fn from_rules(rules: &[ConversionRule]) -> Self {
        let mut map = BTreeMap::new();
        for rule in rules {
            map.insert(rule.source_unit.to_lowercase(), rule.clone());
        }
        Self { rules: map }
    }

    pub fn from_bundle(bundle: &RuleBundle) -> Self {
        Self::from_rules(&bundle.conversion_rules)
    }

    /// Convert a value expressed in `canonical_unit`.
    ///
    /// Applies `(raw + pre_offset) * multiply_by + post_offset` in IEEE-754
    /// double arithmetic, then the rule's explicit rounding if configured.
    pub fn convert(&self, raw_value: f64, canonical_unit: &str) -> Result<Converted, TransformError> {
        let rule = self
            .rules
            .get(&canonical_unit.to_lowercase())
            .ok_or_else(|| TransformError::NoConversionRule {
                unit: canonical_unit.to_string(),
            })?;
        let converted = (raw_value + rule.pre_offset) * rule.multiply_by + rule.post_offset;
        let value = match rule.round_dp {
            Some(dp) => round_dp(converted, dp),
            None => converted,
        };
        Ok(Converted {
            value,
            unit: rule.target_unit.clone(),
        })
    }

    pub fn has_rule_for(&self, canonical_unit: &str) -> bool {
        self.rules.contains_key(&canonical_unit.to_lowercase())
    }
}

/// Round half away from zero to `dp` decimal places.
fn round_dp(value: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}
