//! Downstream publication: standardized rows to CSV, atomically.

use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::info;

use meas_core::{CommitSink, RunReport};
use meas_model::StandardizedObservation;

use crate::error::IngestError;

/// Write standardized rows to `path` so consumers never observe a partial
/// batch: rows go to a sibling temp file which is renamed into place only
/// after a successful flush.
pub fn write_standardized_csv(
    path: &Path,
    rows: &[StandardizedObservation],
) -> Result<(), IngestError> {
    let tmp_path = temp_path(path);
    let result = write_rows(&tmp_path, rows)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(|e| IngestError::io(path, e)));
    if result.is_err() {
        // Leave nothing half-published behind.
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_rows(path: &Path, rows: &[StandardizedObservation]) -> Result<(), IngestError> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, e.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| IngestError::csv(path, e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| IngestError::io(path, e))?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{file_name}.tmp"))
}

/// Commit sink publishing each run as one CSV file under an output
/// directory.
///
/// The file name carries the config version, so reprocessing under a newer
/// version produces a new, distinct file instead of overwriting the earlier
/// run's output.
#[derive(Debug, Clone)]
pub struct CsvRunSink {
    out_dir: PathBuf,
}

impl CsvRunSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Path a run's output lands at.
    pub fn run_path(&self, report: &RunReport) -> PathBuf {
        self.out_dir.join(format!(
            "{}__{}.csv",
            report.definition_id, report.config_version
        ))
    }
}

impl CommitSink for CsvRunSink {
    fn commit(&mut self, report: &RunReport) -> anyhow::Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.run_path(report);
        write_standardized_csv(&path, &report.rows)?;
        info!(path = %path.display(), rows = report.rows.len(), "published run output");
        Ok(())
    }
}
