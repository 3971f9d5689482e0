//! Resolved rule bundles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::definition::{MeasurementDefinition, StandardUnit};
use crate::rules::{BoundsRule, BoundsTier, ConversionRule, UnitRule};

/// Identity of one published config version for a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigVersionMeta {
    pub config_id: String,
    pub config_version: String,
    pub version_datetime: DateTime<Utc>,
}

/// The complete resolved rule set for one definition at one config version.
///
/// A bundle is resolved once per run and treated as immutable from then on:
/// every row processed by that run sees this exact snapshot, and every output
/// row records `config_id`/`config_version` as provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBundle {
    pub definition: MeasurementDefinition,
    pub config_id: String,
    pub config_version: String,
    pub version_datetime: DateTime<Utc>,
    pub standard_units: Vec<StandardUnit>,
    /// Held sorted by ordinal; first match wins.
    pub unit_rules: Vec<UnitRule>,
    pub conversion_rules: Vec<ConversionRule>,
    pub bounds_rules: Vec<BoundsRule>,
}

impl RuleBundle {
    /// The canonical unit flagged as the conversion target.
    pub fn primary_unit(&self) -> Option<&str> {
        self.standard_units
            .iter()
            .find(|u| u.primary)
            .map(|u| u.unit.as_str())
    }

    /// True when `unit` is one of the declared canonical units.
    pub fn declares_unit(&self, unit: &str) -> bool {
        self.standard_units
            .iter()
            .any(|u| u.unit.eq_ignore_ascii_case(unit))
    }

    /// All interval rows configured for a tier. A tier may carry several
    /// rows; membership is the union of their intervals.
    pub fn bounds_for(&self, tier: BoundsTier) -> Vec<&BoundsRule> {
        self.bounds_rules
            .iter()
            .filter(|rule| rule.tier == tier)
            .collect()
    }

    /// Sorts unit rules by ordinal. Stores call this after assembling a
    /// bundle so evaluation order is independent of storage order.
    pub fn sort_unit_rules(&mut self) {
        self.unit_rules.sort_by_key(|rule| rule.ordinal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::UnitRule;
    use chrono::TimeZone;

    fn bundle() -> RuleBundle {
        RuleBundle {
            definition: MeasurementDefinition::new("hba1c", "HbA1c"),
            config_id: "a1b2c3d4".to_string(),
            config_version: "hba1c_20240101_000000".to_string(),
            version_datetime: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            standard_units: vec![
                StandardUnit::new("mmol/mol", true),
                StandardUnit::new("%", false),
            ],
            unit_rules: vec![
                UnitRule::substring(2, "%", "%"),
                UnitRule::substring(1, "mmol", "mmol/mol"),
            ],
            conversion_rules: vec![],
            bounds_rules: vec![],
        }
    }

    #[test]
    fn primary_unit_is_the_flagged_one() {
        assert_eq!(bundle().primary_unit(), Some("mmol/mol"));
    }

    #[test]
    fn sort_unit_rules_orders_by_ordinal() {
        let mut bundle = bundle();
        bundle.sort_unit_rules();
        let ordinals: Vec<u32> = bundle.unit_rules.iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2]);
    }

    #[test]
    fn declares_unit_is_case_insensitive() {
        assert!(bundle().declares_unit("MMOL/MOL"));
        assert!(!bundle().declares_unit("mg/dL"));
    }
}
