//! Shared CSV utilities for loading config tables.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::ConfigError;

/// Read a CSV file into a vector of row maps.
///
/// Each row is represented as a BTreeMap with column headers as keys.
/// Handles BOM characters and trims whitespace from values.
pub fn read_csv_rows(path: &Path) -> Result<Vec<BTreeMap<String, String>>, ConfigError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| ConfigError::table(path, e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| ConfigError::table(path, e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ConfigError::table(path, e.to_string()))?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .trim()
                .to_lowercase();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Get a field value from a row, returning empty string if not present.
pub fn get_field(row: &BTreeMap<String, String>, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

/// Get an optional field value from a row (None if empty or missing).
pub fn get_optional(row: &BTreeMap<String, String>, key: &str) -> Option<String> {
    row.get(key).filter(|v| !v.is_empty()).cloned()
}

/// Parse a required float field.
pub fn parse_f64_field(
    row: &BTreeMap<String, String>,
    key: &str,
    path: &Path,
) -> Result<f64, ConfigError> {
    let raw = get_field(row, key);
    raw.parse::<f64>()
        .map_err(|_| ConfigError::table(path, format!("invalid number '{raw}' in column {key}")))
}

/// Parse a boolean flag field. Accepts true/false, yes/no, y/n and 1/0.
pub fn parse_bool_field(
    row: &BTreeMap<String, String>,
    key: &str,
    path: &Path,
) -> Result<bool, ConfigError> {
    let raw = get_field(row, key);
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(ConfigError::table(
            path,
            format!("invalid flag '{other}' in column {key}"),
        )),
    }
}
