//! Command implementations wiring stores, ingest and the orchestrator.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::trace;

use meas_config::{ConfigStore, CsvConfigStore};
use meas_core::{RunOptions, RunReport, execute_run};
use meas_ingest::{CsvRunSink, read_observations_for};
use meas_model::ConfigVersionMeta;

use crate::cli::{RunArgs, VersionsArgs};
use crate::logging::redact_value;

/// A completed run together with where its output was published.
pub struct StandardiseOutcome {
    pub report: RunReport,
    pub output_path: PathBuf,
}

pub fn run_standardise(args: &RunArgs) -> anyhow::Result<StandardiseOutcome> {
    let as_of = args
        .as_of
        .as_deref()
        .map(parse_as_of)
        .transpose()
        .context("invalid --as-of value")?;

    let store = CsvConfigStore::new(&args.config);
    let observations = read_observations_for(&args.observations, &args.definition)?;
    anyhow::ensure!(
        !observations.is_empty(),
        "no observations for definition '{}' in {}",
        args.definition,
        args.observations.display()
    );

    let mut sink = CsvRunSink::new(&args.out);
    let options = RunOptions {
        as_of,
        workers: args.workers,
    };
    let report = execute_run(&store, &mut sink, &args.definition, observations, &options)?;

    for row in &report.rows {
        trace!(
            person_id = %row.person_id,
            status = %row.status,
            value = redact_value(row.source_result_value.as_deref().unwrap_or("")),
            "row outcome"
        );
    }

    let output_path = sink.run_path(&report);
    Ok(StandardiseOutcome {
        report,
        output_path,
    })
}

pub fn run_versions(args: &VersionsArgs) -> anyhow::Result<Vec<ConfigVersionMeta>> {
    let store = CsvConfigStore::new(&args.config);
    let mut versions = store.versions(&args.definition)?;
    anyhow::ensure!(
        !versions.is_empty(),
        "no config published for definition '{}'",
        args.definition
    );
    versions.sort_by(|a, b| {
        a.version_datetime
            .cmp(&b.version_datetime)
            .then_with(|| a.config_version.cmp(&b.config_version))
    });
    Ok(versions)
}

/// Parse an `--as-of` value: RFC 3339, or a bare date taken as end of that
/// day so "reprocess as of 2024-06-01" includes versions published during it.
fn parse_as_of(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && let Some(end_of_day) = date.and_hms_opt(23, 59, 59)
    {
        return Ok(end_of_day.and_utc());
    }
    anyhow::bail!("expected RFC 3339 timestamp or YYYY-MM-DD, got '{raw}'")
}

#[cfg(test)]
mod tests {
    use super::parse_as_of;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_rfc3339() {
        let ts = parse_as_of("2024-06-01T12:30:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn bare_date_means_end_of_day() {
        let ts = parse_as_of("2024-06-01").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 59).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_as_of("yesterday").is_err());
    }
}
