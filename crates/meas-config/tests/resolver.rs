use chrono::{TimeZone, Utc};

use meas_config::{ConfigError, ConfigStore, MemoryConfigStore, RuleBundleBuilder};
use meas_model::{ConversionRule, UnitRule};

fn store_with_versions() -> MemoryConfigStore {
    let v1 = RuleBundleBuilder::new("hba1c", "HbA1c")
        .version("HbA1c_20240101_000000", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .standard_unit("mmol/mol", true)
        .unit_rule(UnitRule::substring(1, "mmol", "mmol/mol"))
        .conversion(ConversionRule::identity("mmol/mol"))
        .build();
    let v2 = RuleBundleBuilder::new("hba1c", "HbA1c")
        .version("HbA1c_20240601_000000", Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        .standard_unit("mmol/mol", true)
        .standard_unit("%", false)
        .unit_rule(UnitRule::substring(1, "mmol", "mmol/mol"))
        .unit_rule(UnitRule::substring(2, "%", "%"))
        .conversion(ConversionRule::identity("mmol/mol"))
        .conversion(ConversionRule::new("%", "mmol/mol", -2.15, 10.929, 0.0))
        .build();
    MemoryConfigStore::new().with_bundle(v1).with_bundle(v2)
}

#[test]
fn latest_resolves_to_greatest_version() {
    let store = store_with_versions();
    let bundle = store.resolve("hba1c", None).unwrap();
    assert_eq!(bundle.config_version, "HbA1c_20240601_000000");
    assert_eq!(bundle.unit_rules.len(), 2);
}

#[test]
fn as_of_resolves_to_version_published_at_or_before() {
    let store = store_with_versions();

    let at_v1 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let bundle = store.resolve("hba1c", Some(at_v1)).unwrap();
    assert_eq!(bundle.config_version, "HbA1c_20240101_000000");

    // Exactly at the publication instant the version is visible.
    let at_publication = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let bundle = store.resolve("hba1c", Some(at_publication)).unwrap();
    assert_eq!(bundle.config_version, "HbA1c_20240601_000000");
}

#[test]
fn as_of_is_stable_as_newer_versions_are_published() {
    let mut store = store_with_versions();
    let as_of = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let before = store.resolve("hba1c", Some(as_of)).unwrap();

    store.publish(
        RuleBundleBuilder::new("hba1c", "HbA1c")
            .version("HbA1c_20250101_000000", Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
            .standard_unit("mmol/mol", true)
            .build(),
    );

    let after = store.resolve("hba1c", Some(as_of)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn unknown_definition_fails_with_not_found() {
    let store = store_with_versions();
    let err = store.resolve("creatinine", None).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }));
}

#[test]
fn as_of_before_first_version_fails_with_not_found() {
    let store = store_with_versions();
    let too_early = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let err = store.resolve("hba1c", Some(too_early)).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }));
}

#[test]
fn resolved_unit_rules_are_ordinal_sorted() {
    let bundle = RuleBundleBuilder::new("x", "X")
        .version("v", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .standard_unit("u", true)
        .unit_rule(UnitRule::substring(5, "b", "u"))
        .unit_rule(UnitRule::substring(1, "a", "u"))
        .build();
    let store = MemoryConfigStore::new().with_bundle(bundle);
    let resolved = store.resolve("x", None).unwrap();
    let ordinals: Vec<u32> = resolved.unit_rules.iter().map(|r| r.ordinal).collect();
    assert_eq!(ordinals, vec![1, 5]);
}
