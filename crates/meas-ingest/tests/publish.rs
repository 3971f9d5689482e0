use std::fs;

use chrono::{TimeZone, Utc};

use meas_config::{MemoryConfigStore, RuleBundleBuilder};
use meas_core::{RunOptions, execute_run};
use meas_ingest::{CsvRunSink, write_standardized_csv};
use meas_model::{ConversionRule, RawObservation, UnitRule};

fn store() -> MemoryConfigStore {
    let bundle = RuleBundleBuilder::new("hba1c_definition_gp", "HbA1c")
        .version(
            "HbA1c_20240601_000000",
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        )
        .standard_unit("mmol/mol", true)
        .unit_rule(UnitRule::substring(1, "mmol", "mmol/mol"))
        .conversion(ConversionRule::identity("mmol/mol"))
        .build();
    MemoryConfigStore::new().with_bundle(bundle)
}

fn batch() -> Vec<RawObservation> {
    vec![
        RawObservation {
            person_id: "p1".to_string(),
            definition_id: "hba1c_definition_gp".to_string(),
            event_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 14),
            age_at_event: Some(54.0),
            raw_value: Some("48".to_string()),
            raw_unit: Some("mmol/mol".to_string()),
        },
        RawObservation {
            person_id: "p2".to_string(),
            definition_id: "hba1c_definition_gp".to_string(),
            event_date: None,
            age_at_event: None,
            raw_value: Some("52".to_string()),
            raw_unit: Some("bananas".to_string()),
        },
    ]
}

#[test]
fn published_file_is_named_by_definition_and_config_version() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = CsvRunSink::new(dir.path());
    let report = execute_run(
        &store(),
        &mut sink,
        "hba1c_definition_gp",
        batch(),
        &RunOptions::default(),
    )
    .unwrap();

    let path = dir
        .path()
        .join("hba1c_definition_gp__HbA1c_20240601_000000.csv");
    assert!(path.exists());
    assert_eq!(sink.run_path(&report), path);

    let contents = fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("person_id,event_date,age_at_event,definition_id"));
    assert!(header.contains("config_version"));
    assert!(header.ends_with("status"));
    assert_eq!(lines.clone().count(), 2);
    assert!(contents.contains("UNMAPPED_UNIT"));
    assert!(contents.contains("OK"));
}

#[test]
fn no_temp_file_remains_after_publication() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = CsvRunSink::new(dir.path());
    execute_run(
        &store(),
        &mut sink,
        "hba1c_definition_gp",
        batch(),
        &RunOptions::default(),
    )
    .unwrap();

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
}

#[test]
fn rerun_with_same_config_overwrites_byte_identically() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = CsvRunSink::new(dir.path());
    let report = execute_run(
        &store(),
        &mut sink,
        "hba1c_definition_gp",
        batch(),
        &RunOptions::default(),
    )
    .unwrap();
    let path = sink.run_path(&report);
    let first = fs::read(&path).unwrap();

    execute_run(
        &store(),
        &mut sink,
        "hba1c_definition_gp",
        batch(),
        &RunOptions::default(),
    )
    .unwrap();
    let second = fs::read(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn write_failure_leaves_no_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let missing_dir = dir.path().join("does-not-exist");
    let target = missing_dir.join("out.csv");
    let err = write_standardized_csv(&target, &[]);
    assert!(err.is_err());
    assert!(!target.exists());
}
