//! The publication seam.

use meas_model::StandardizedObservation;

use crate::run::RunReport;

/// Destination for a completed run's output.
///
/// Publication is all-or-nothing at run granularity: a sink must make the
/// whole batch visible together or leave nothing visible. The orchestrator
/// calls `commit` exactly once per run, after every row has been
/// standardized.
pub trait CommitSink {
    fn commit(&mut self, report: &RunReport) -> anyhow::Result<()>;
}

/// Sink retaining committed runs in memory, for tests and embedders.
///
/// Committed batches append; a reprocessing run never overwrites an earlier
/// one.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub committed: Vec<Vec<StandardizedObservation>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_rows(&self) -> usize {
        self.committed.iter().map(Vec::len).sum()
    }
}

impl CommitSink for MemorySink {
    fn commit(&mut self, report: &RunReport) -> anyhow::Result<()> {
        self.committed.push(report.rows.clone());
        Ok(())
    }
}
