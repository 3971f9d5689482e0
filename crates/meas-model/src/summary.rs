//! Per-run QA summary.
//!
//! The summary is the primary feedback mechanism for config authors: a spike
//! in UNMAPPED_UNIT after a run signals a new source unit string needing a
//! mapping rule, and shifts in the flag distribution signal cutoffs needing
//! review.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::observation::{ObservationStatus, StandardizedObservation};

/// Counts of row outcomes and flag distributions for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub status_counts: BTreeMap<ObservationStatus, usize>,
    pub confidence_true: usize,
    pub confidence_false: usize,
    pub possible_true: usize,
    pub possible_false: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, row: &StandardizedObservation) {
        self.total += 1;
        *self.status_counts.entry(row.status).or_insert(0) += 1;
        if row.confidence {
            self.confidence_true += 1;
        } else {
            self.confidence_false += 1;
        }
        if row.possible {
            self.possible_true += 1;
        } else {
            self.possible_false += 1;
        }
    }

    pub fn from_rows(rows: &[StandardizedObservation]) -> Self {
        let mut summary = Self::new();
        for row in rows {
            summary.record(row);
        }
        summary
    }

    pub fn count(&self, status: ObservationStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    /// Rows that did not standardise cleanly.
    pub fn warning_count(&self) -> usize {
        self.total - self.count(ObservationStatus::Ok)
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }
}
