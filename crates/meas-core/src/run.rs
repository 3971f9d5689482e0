//! The batch run: resolve once, three transform passes, one atomic commit.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use meas_config::ConfigStore;
use meas_model::{
    ObservationStatus, RawObservation, RuleBundle, RunSummary, StandardizedObservation,
};
use meas_transform::{UnitClassifier, UnitConverter, parse_result_value};
use meas_validate::{BoundsFlags, BoundsValidator};

use crate::error::RunError;
use crate::shard::map_sharded;
use crate::sink::CommitSink;
use crate::state::RunState;

/// Parameters of one batch run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Resolve config as of this instant; `None` means latest published.
    pub as_of: Option<DateTime<Utc>>,
    /// Worker threads for the transform passes. Output is identical for any
    /// value; this only affects wall-clock time.
    pub workers: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            as_of: None,
            workers: 1,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub definition_id: String,
    pub definition_version: Option<String>,
    pub config_id: String,
    pub config_version: String,
    pub state: RunState,
    pub summary: RunSummary,
    pub rows: Vec<StandardizedObservation>,
}

/// A row in flight between passes.
#[derive(Debug, Clone)]
struct RowState {
    raw: RawObservation,
    canonical_unit: Option<String>,
    value: Option<f64>,
    value_unit: Option<String>,
    failure: Option<ObservationStatus>,
    flags: BoundsFlags,
}

impl RowState {
    fn new(raw: RawObservation) -> Self {
        Self {
            raw,
            canonical_unit: None,
            value: None,
            value_unit: None,
            failure: None,
            flags: BoundsFlags::default(),
        }
    }

    fn into_standardized(self, bundle: &RuleBundle) -> StandardizedObservation {
        StandardizedObservation {
            person_id: self.raw.person_id,
            event_date: self.raw.event_date,
            age_at_event: self.raw.age_at_event,
            definition_id: bundle.definition.id.clone(),
            definition_version: bundle.definition.version.clone(),
            config_id: bundle.config_id.clone(),
            config_version: bundle.config_version.clone(),
            source_result_value: self.raw.raw_value,
            source_result_value_units: self.raw.raw_unit,
            canonical_unit: self.canonical_unit,
            value_as_number: self.value,
            value_units: self.value_unit,
            confidence: self.flags.confidence,
            possible: self.flags.possible,
            status: self.failure.unwrap_or(ObservationStatus::Ok),
        }
    }
}

/// Drive one definition's batch from raw observations to committed output.
///
/// Config is resolved exactly once; the resolved bundle is immutable for the
/// duration of the run, so every row sees one consistent rule snapshot and
/// the whole run is reproducible from `(input, config_version)`. Per-row
/// failures become row statuses; only configuration problems or a commit
/// failure abort the run, and an aborted run publishes nothing.
pub fn execute_run<S, K>(
    store: &S,
    sink: &mut K,
    definition_id: &str,
    observations: Vec<RawObservation>,
    options: &RunOptions,
) -> Result<RunReport, RunError>
where
    S: ConfigStore,
    K: CommitSink + ?Sized,
{
    let mut state = RunState::Pending;
    info!(definition_id, rows = observations.len(), %state, "run started");

    let bundle = match store.resolve(definition_id, options.as_of) {
        Ok(bundle) => bundle,
        Err(err) => return Err(fail(&mut state, err.into())),
    };
    let classifier = match UnitClassifier::from_bundle(&bundle) {
        Ok(classifier) => classifier,
        Err(err) => return Err(fail(&mut state, err.into())),
    };
    let converter = UnitConverter::from_bundle(&bundle);
    let validator = BoundsValidator::from_bundle(&bundle);
    info!(
        config_id = %bundle.config_id,
        config_version = %bundle.config_version,
        unit_rules = bundle.unit_rules.len(),
        "resolved rule bundle"
    );

    let workers = options.workers;
    let rows: Vec<RowState> = observations.into_iter().map(RowState::new).collect();

    transition(&mut state, RunState::Classifying);
    let rows = map_sharded(rows, workers, |row| classify_row(row, &classifier));

    transition(&mut state, RunState::Converting);
    let rows = map_sharded(rows, workers, |row| convert_row(row, &converter));

    transition(&mut state, RunState::Validating);
    let rows = map_sharded(rows, workers, |row| validate_row(row, &validator));

    let standardized: Vec<StandardizedObservation> = rows
        .into_iter()
        .map(|row| row.into_standardized(&bundle))
        .collect();
    let summary = RunSummary::from_rows(&standardized);

    transition(&mut state, RunState::Committing);
    let mut report = RunReport {
        definition_id: bundle.definition.id.clone(),
        definition_version: bundle.definition.version.clone(),
        config_id: bundle.config_id.clone(),
        config_version: bundle.config_version.clone(),
        state,
        summary,
        rows: standardized,
    };
    if let Err(err) = sink.commit(&report) {
        return Err(fail(&mut state, RunError::Commit(err)));
    }

    transition(&mut state, RunState::Complete);
    report.state = state;
    if report.summary.has_warnings() {
        warn!(
            definition_id,
            warnings = report.summary.warning_count(),
            "run completed with rows that did not standardise cleanly"
        );
    }
    info!(
        definition_id,
        total = report.summary.total,
        ok = report.summary.count(ObservationStatus::Ok),
        "run complete"
    );
    Ok(report)
}

fn classify_row(mut row: RowState, classifier: &UnitClassifier) -> RowState {
    let canonical = row
        .raw
        .raw_unit
        .as_deref()
        .and_then(|unit| classifier.classify(unit))
        .map(str::to_string);
    match canonical {
        Some(unit) => row.canonical_unit = Some(unit),
        None => row.failure = Some(ObservationStatus::UnmappedUnit),
    }
    row
}

fn convert_row(mut row: RowState, converter: &UnitConverter) -> RowState {
    if row.failure.is_some() {
        return row;
    }
    let Some(canonical) = row.canonical_unit.clone() else {
        return row;
    };
    let parsed = row
        .raw
        .raw_value
        .as_deref()
        .and_then(parse_result_value);
    let Some(parsed) = parsed else {
        row.failure = Some(ObservationStatus::ParseError);
        return row;
    };
    match converter.convert(parsed, &canonical) {
        Ok(converted) => {
            row.value = Some(converted.value);
            row.value_unit = Some(converted.unit);
        }
        Err(_) => row.failure = Some(ObservationStatus::NoConversionRule),
    }
    row
}

fn validate_row(mut row: RowState, validator: &BoundsValidator) -> RowState {
    row.flags = validator.validate(row.value);
    row
}

fn transition(state: &mut RunState, next: RunState) {
    info!(from = %state, to = %next, "run state");
    *state = next;
}

fn fail(state: &mut RunState, err: RunError) -> RunError {
    transition(state, RunState::Failed);
    warn!(error = %err, "run aborted before publication");
    err
}
