//! Observation Source adapter: CSV rows into [`RawObservation`]s.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use meas_model::RawObservation;

use crate::error::IngestError;

/// Read every raw observation from a CSV export.
///
/// Expected headers: `person_id, definition_id, clinical_effective_date,
/// age_at_event, result_value, result_value_units`. Blank cells are nulls;
/// result values stay as text so unparsable entries reach the pipeline and
/// are counted there rather than dropped at the door.
pub fn read_observations_csv(path: &Path) -> Result<Vec<RawObservation>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| match e.kind() {
            csv::ErrorKind::Io(_) => {
                IngestError::io(path, std::io::Error::other(e.to_string()))
            }
            _ => IngestError::csv(path, e.to_string()),
        })?;

    let mut rows = Vec::new();
    for record in reader.deserialize::<RawObservation>() {
        let row = record.map_err(|e| IngestError::csv(path, e.to_string()))?;
        rows.push(row);
    }
    debug!(path = %path.display(), rows = rows.len(), "read raw observations");
    Ok(rows)
}

/// Read only the rows belonging to one definition.
///
/// Observation exports routinely interleave definitions; a run always
/// processes exactly one.
pub fn read_observations_for(
    path: &Path,
    definition_id: &str,
) -> Result<Vec<RawObservation>, IngestError> {
    let mut rows = read_observations_csv(path)?;
    rows.retain(|row| row.definition_id == definition_id);
    Ok(rows)
}
