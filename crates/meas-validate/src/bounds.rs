//! Per-tier interval checks.

use serde::{Deserialize, Serialize};

use meas_model::{BoundsRule, BoundsTier, RuleBundle};

/// Outcome of bounds validation for one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundsFlags {
    pub confidence: bool,
    pub possible: bool,
}

/// Interval tests for one resolved bundle.
///
/// A tier may be configured as several interval rows; a value passes the
/// tier when it falls inside any of them. This is how source cutoffs with
/// excluded interior bands (plausible low range, implausible middle,
/// plausible high range) are expressed. Each tier is evaluated
/// independently; a tier with no configured rows yields `false`, as does a
/// null value. A failed conversion upstream never short-circuits
/// validation, it just means neither tier can vouch for the row.
#[derive(Debug, Clone, Default)]
pub struct BoundsValidator {
    confidence: Vec<BoundsRule>,
    possible: Vec<BoundsRule>,
}

impl BoundsValidator {
    pub fn from_rules(rules: &[BoundsRule]) -> Self {
        let mut validator = Self::default();
        for rule in rules {
            match rule.tier {
                BoundsTier::Confidence => validator.confidence.push(rule.clone()),
                BoundsTier::Possible => validator.possible.push(rule.clone()),
            }
        }
        validator
    }

    pub fn from_bundle(bundle: &RuleBundle) -> Self {
        Self::from_rules(&bundle.bounds_rules)
    }

    pub fn validate(&self, value: Option<f64>) -> BoundsFlags {
        let Some(value) = value else {
            return BoundsFlags::default();
        };
        BoundsFlags {
            confidence: tier_contains(&self.confidence, value),
            possible: tier_contains(&self.possible, value),
        }
    }
}

fn tier_contains(rules: &[BoundsRule], value: f64) -> bool {
    rules.iter().any(|rule| rule.contains(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// HbA1c-like cutoffs: confidence is the single band [19, 200]; possible
    /// is [3, 15) union [19, 200], excluding the interior band [15, 19) and
    /// both extremes. The tiers do not nest, on purpose.
    fn hba1c_like() -> BoundsValidator {
        BoundsValidator::from_rules(&[
            BoundsRule::inclusive(BoundsTier::Confidence, 19.0, 200.0),
            BoundsRule {
                tier: BoundsTier::Possible,
                lower_limit: 3.0,
                lower_inclusive: true,
                upper_limit: 15.0,
                upper_inclusive: false,
            },
            BoundsRule::inclusive(BoundsTier::Possible, 19.0, 200.0),
        ])
    }

    #[test]
    fn boundary_values_respect_inclusivity() {
        let validator = hba1c_like();
        assert!(!validator.validate(Some(18.9)).confidence);
        assert!(validator.validate(Some(19.0)).confidence);
        assert!(validator.validate(Some(200.0)).confidence);
        assert!(!validator.validate(Some(200.1)).confidence);
    }

    #[test]
    fn excluded_interior_band_fails_both_tiers() {
        let flags = hba1c_like().validate(Some(16.0));
        assert!(!flags.confidence);
        assert!(!flags.possible);
    }

    #[test]
    fn value_can_be_possible_without_being_confident() {
        let flags = hba1c_like().validate(Some(10.0));
        assert!(!flags.confidence);
        assert!(flags.possible);
    }

    #[test]
    fn null_value_fails_both_tiers() {
        let flags = hba1c_like().validate(None);
        assert_eq!(flags, BoundsFlags::default());
    }

    #[test]
    fn missing_tier_yields_false_for_that_tier_only() {
        let validator = BoundsValidator::from_rules(&[BoundsRule::inclusive(
            BoundsTier::Confidence,
            19.0,
            200.0,
        )]);
        let flags = validator.validate(Some(48.0));
        assert!(flags.confidence);
        assert!(!flags.possible);
    }

    #[test]
    fn strict_bounds_exclude_the_limit() {
        let validator = BoundsValidator::from_rules(&[BoundsRule {
            tier: BoundsTier::Possible,
            lower_limit: 3.0,
            lower_inclusive: false,
            upper_limit: 200.0,
            upper_inclusive: false,
        }]);
        assert!(!validator.validate(Some(3.0)).possible);
        assert!(validator.validate(Some(3.0001)).possible);
        assert!(!validator.validate(Some(200.0)).possible);
    }
}
