//! Raw inbound observations and standardized outbound rows.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One raw clinical measurement event from the observation source.
///
/// Append-only and immutable upstream; the engine never alters it. The result
/// value arrives as free text because source systems mix numerics with entry
/// artifacts, and the unit is an uncontrolled string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub person_id: String,
    pub definition_id: String,
    #[serde(rename = "clinical_effective_date")]
    pub event_date: Option<NaiveDate>,
    pub age_at_event: Option<f64>,
    #[serde(rename = "result_value")]
    pub raw_value: Option<String>,
    #[serde(rename = "result_value_units")]
    pub raw_unit: Option<String>,
}

/// Per-row outcome of the standardisation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObservationStatus {
    Ok,
    /// No unit rule matched the raw unit string. The row keeps a null
    /// canonical unit rather than defaulting to an arbitrary one.
    UnmappedUnit,
    /// The unit classified but no conversion rule exists for it.
    NoConversionRule,
    /// The raw result value could not be parsed as a number.
    ParseError,
}

impl ObservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationStatus::Ok => "OK",
            ObservationStatus::UnmappedUnit => "UNMAPPED_UNIT",
            ObservationStatus::NoConversionRule => "NO_CONVERSION_RULE",
            ObservationStatus::ParseError => "PARSE_ERROR",
        }
    }

    /// All statuses in summary display order.
    pub const ALL: [ObservationStatus; 4] = [
        ObservationStatus::Ok,
        ObservationStatus::UnmappedUnit,
        ObservationStatus::NoConversionRule,
        ObservationStatus::ParseError,
    ];
}

impl fmt::Display for ObservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObservationStatus {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "OK" => Ok(ObservationStatus::Ok),
            "UNMAPPED_UNIT" => Ok(ObservationStatus::UnmappedUnit),
            "NO_CONVERSION_RULE" => Ok(ObservationStatus::NoConversionRule),
            "PARSE_ERROR" => Ok(ObservationStatus::ParseError),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// One standardized observation as published to downstream consumers.
///
/// Carries the exact config id/version used to produce it; reprocessing under
/// a newer config version yields a new, distinct record rather than an
/// in-place overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedObservation {
    pub person_id: String,
    pub event_date: Option<NaiveDate>,
    pub age_at_event: Option<f64>,
    pub definition_id: String,
    pub definition_version: Option<String>,
    pub config_id: String,
    pub config_version: String,
    pub source_result_value: Option<String>,
    pub source_result_value_units: Option<String>,
    pub canonical_unit: Option<String>,
    pub value_as_number: Option<f64>,
    pub value_units: Option<String>,
    pub confidence: bool,
    pub possible: bool,
    pub status: ObservationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&ObservationStatus::NoConversionRule).unwrap();
        assert_eq!(json, "\"NO_CONVERSION_RULE\"");
        let back: ObservationStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ObservationStatus::NoConversionRule);
    }

    #[test]
    fn status_round_trips_from_str() {
        for status in ObservationStatus::ALL {
            assert_eq!(status.as_str().parse::<ObservationStatus>().unwrap(), status);
        }
    }

    #[test]
    fn raw_observation_uses_source_column_names() {
        let json = r#"{
            "person_id": "p1",
            "definition_id": "hba1c",
            "clinical_effective_date": "2023-06-01",
            "age_at_event": 54.0,
            "result_value": "7.0",
            "result_value_units": "%"
        }"#;
        let row: RawObservation = serde_json::from_str(json).unwrap();
        assert_eq!(row.raw_value.as_deref(), Some("7.0"));
        assert_eq!(row.raw_unit.as_deref(), Some("%"));
    }
}
