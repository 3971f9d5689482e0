use chrono::{TimeZone, Utc};

use meas_config::{ConfigError, ConfigStore, MemoryConfigStore, RuleBundleBuilder};
use meas_model::{BoundsRule, BoundsTier, ConversionRule, UnitRule};

fn base() -> RuleBundleBuilder {
    RuleBundleBuilder::new("hba1c", "HbA1c")
        .version("v1", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

fn resolve_err(builder: RuleBundleBuilder) -> ConfigError {
    let store = MemoryConfigStore::new().with_bundle(builder.build());
    store.resolve("hba1c", None).unwrap_err()
}

fn assert_malformed(err: &ConfigError, fragment: &str) {
    match err {
        ConfigError::Malformed { message, .. } => {
            assert!(
                message.contains(fragment),
                "expected '{fragment}' in '{message}'"
            );
        }
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[test]
fn missing_primary_unit_is_malformed() {
    let err = resolve_err(base().standard_unit("mmol/mol", false));
    assert_malformed(&err, "no primary standard unit");
}

#[test]
fn duplicate_primary_unit_is_malformed() {
    let err = resolve_err(
        base()
            .standard_unit("mmol/mol", true)
            .standard_unit("%", true),
    );
    assert_malformed(&err, "more than one primary");
}

#[test]
fn unit_rule_onto_undeclared_unit_is_malformed() {
    let err = resolve_err(
        base()
            .standard_unit("mmol/mol", true)
            .unit_rule(UnitRule::substring(1, "mg", "mg/dL")),
    );
    assert_malformed(&err, "undeclared unit 'mg/dL'");
}

#[test]
fn conversion_with_undeclared_source_is_malformed() {
    let err = resolve_err(
        base()
            .standard_unit("mmol/mol", true)
            .conversion(ConversionRule::new("%", "mmol/mol", -2.15, 10.929, 0.0)),
    );
    assert_malformed(&err, "undeclared source unit '%'");
}

#[test]
fn invalid_regex_pattern_is_malformed() {
    let err = resolve_err(
        base()
            .standard_unit("mmol/mol", true)
            .unit_rule(UnitRule::regex(1, "(mmol", "mmol/mol")),
    );
    assert_malformed(&err, "invalid regex pattern");
}

#[test]
fn duplicate_ordinal_is_malformed() {
    let err = resolve_err(
        base()
            .standard_unit("mmol/mol", true)
            .unit_rule(UnitRule::substring(1, "mmol", "mmol/mol"))
            .unit_rule(UnitRule::substring(1, "ifcc", "mmol/mol")),
    );
    assert_malformed(&err, "duplicate unit rule ordinal 1");
}

#[test]
fn multiple_interval_rows_per_tier_are_accepted() {
    // A tier with an excluded interior band is two interval rows.
    let store = MemoryConfigStore::new().with_bundle(
        base()
            .standard_unit("mmol/mol", true)
            .bounds(BoundsRule {
                tier: BoundsTier::Possible,
                lower_limit: 3.0,
                lower_inclusive: true,
                upper_limit: 15.0,
                upper_inclusive: false,
            })
            .bounds(BoundsRule::inclusive(BoundsTier::Possible, 19.0, 200.0))
            .build(),
    );
    assert!(store.resolve("hba1c", None).is_ok());
}

#[test]
fn inverted_limits_are_malformed() {
    let err = resolve_err(
        base()
            .standard_unit("mmol/mol", true)
            .bounds(BoundsRule::inclusive(BoundsTier::Possible, 200.0, 3.0)),
    );
    assert_malformed(&err, "inverted limits for tier 'possible'");
}

#[test]
fn non_nested_tiers_are_accepted_as_configured() {
    // The possible tier is narrower than confidence here. Deliberately odd,
    // deliberately not rejected: tiers are tuned independently.
    let store = MemoryConfigStore::new().with_bundle(
        base()
            .standard_unit("mmol/mol", true)
            .bounds(BoundsRule::inclusive(BoundsTier::Confidence, 19.0, 200.0))
            .bounds(BoundsRule::inclusive(BoundsTier::Possible, 50.0, 60.0))
            .build(),
    );
    assert!(store.resolve("hba1c", None).is_ok());
}
