//! Load-time rule-set validation.
//!
//! A bundle that fails any of these checks is unusable and must prevent the
//! run from starting; per-row leniency never extends to the rule set itself.

use std::collections::BTreeSet;

use meas_model::RuleBundle;

use crate::error::ConfigError;

/// Checks structural integrity of a resolved bundle.
///
/// Rejected configurations:
/// - no primary standard unit, or more than one
/// - a unit rule mapping onto an undeclared canonical unit
/// - a conversion rule whose source or target unit is undeclared
/// - an invalid regex pattern in a unit rule
/// - duplicate unit-rule ordinals (evaluation order would be ambiguous)
/// - inverted bounds limits (lower > upper) in any tier row
pub fn validate_bundle(bundle: &RuleBundle) -> Result<(), ConfigError> {
    let primary_count = bundle.standard_units.iter().filter(|u| u.primary).count();
    if primary_count == 0 {
        return Err(malformed(bundle, "no primary standard unit configured"));
    }
    if primary_count > 1 {
        return Err(malformed(bundle, "more than one primary standard unit"));
    }

    let mut ordinals = BTreeSet::new();
    for rule in &bundle.unit_rules {
        if !ordinals.insert(rule.ordinal) {
            return Err(malformed(
                bundle,
                format!("duplicate unit rule ordinal {}", rule.ordinal),
            ));
        }
        if !bundle.declares_unit(&rule.canonical_unit) {
            return Err(malformed(
                bundle,
                format!(
                    "unit rule {} maps onto undeclared unit '{}'",
                    rule.ordinal, rule.canonical_unit
                ),
            ));
        }
        if rule.kind == meas_model::PatternKind::Regex {
            if let Err(err) = regex::Regex::new(&rule.pattern) {
                return Err(malformed(
                    bundle,
                    format!("invalid regex pattern '{}': {err}", rule.pattern),
                ));
            }
        }
    }

    for rule in &bundle.conversion_rules {
        if !bundle.declares_unit(&rule.source_unit) {
            return Err(malformed(
                bundle,
                format!(
                    "conversion rule references undeclared source unit '{}'",
                    rule.source_unit
                ),
            ));
        }
        if !bundle.declares_unit(&rule.target_unit) {
            return Err(malformed(
                bundle,
                format!(
                    "conversion rule references undeclared target unit '{}'",
                    rule.target_unit
                ),
            ));
        }
    }

    for rule in &bundle.bounds_rules {
        if rule.lower_limit > rule.upper_limit {
            return Err(malformed(
                bundle,
                format!(
                    "inverted limits for tier '{}': {} > {}",
                    rule.tier, rule.lower_limit, rule.upper_limit
                ),
            ));
        }
    }

    Ok(())
}

fn malformed(bundle: &RuleBundle, message: impl Into<String>) -> ConfigError {
    ConfigError::Malformed {
        definition_id: bundle.definition.id.clone(),
        config_version: bundle.config_version.clone(),
        message: message.into(),
    }
}
