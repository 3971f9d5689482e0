//! Config store over the four versioned CSV config tables.
//!
//! Layout of a config directory:
//!
//! ```text
//! config/
//! ├── standard_units.csv    definition_id, config_id, config_version, version_datetime, unit, primary_unit_flag
//! ├── unit_mappings.csv     ... , ordinal, source_unit_pattern, match_kind, standard_unit
//! ├── unit_conversions.csv  ... , source_canonical_unit, target_unit, pre_offset, multiply_by, post_offset, round_dp
//! ├── value_bounds.csv      ... , tier, lower_limit, lower_inclusive, upper_limit, upper_inclusive
//! └── definitions.csv       definition_id, definition_name, definition_version   (optional)
//! ```
//!
//! Every row carries its full `(definition_id, config_id, config_version,
//! version_datetime)` key. Publishing a new version appends rows under a new
//! version label; prior versions stay queryable, which is what makes
//! historical reprocessing reproducible.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use meas_model::{
    BoundsRule, BoundsTier, ConfigVersionMeta, ConversionRule, MeasurementDefinition, PatternKind,
    RuleBundle, StandardUnit, UnitRule,
};

use crate::csv_utils::{
    get_field, get_optional, parse_bool_field, parse_f64_field, read_csv_rows,
};
use crate::error::ConfigError;
use crate::store::ConfigStore;

pub const STANDARD_UNITS_FILE: &str = "standard_units.csv";
pub const UNIT_MAPPINGS_FILE: &str = "unit_mappings.csv";
pub const UNIT_CONVERSIONS_FILE: &str = "unit_conversions.csv";
pub const VALUE_BOUNDS_FILE: &str = "value_bounds.csv";
pub const DEFINITIONS_FILE: &str = "definitions.csv";

/// Store reading the versioned config tables from a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvConfigStore {
    root: PathBuf,
}

impl CsvConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn read_table(
        &self,
        name: &str,
    ) -> Result<Vec<BTreeMap<String, String>>, ConfigError> {
        let path = self.table_path(name);
        if !path.exists() {
            return Err(ConfigError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "config table missing"),
            ));
        }
        read_csv_rows(&path)
    }

    /// Rows of one table belonging to a definition at a specific version.
    fn version_rows(
        &self,
        name: &str,
        definition_id: &str,
        config_version: &str,
    ) -> Result<Vec<BTreeMap<String, String>>, ConfigError> {
        Ok(self
            .read_table(name)?
            .into_iter()
            .filter(|row| {
                get_field(row, "definition_id") == definition_id
                    && get_field(row, "config_version") == config_version
            })
            .collect())
    }

    fn definition_meta(&self, definition_id: &str) -> Result<MeasurementDefinition, ConfigError> {
        let path = self.table_path(DEFINITIONS_FILE);
        if path.exists() {
            for row in read_csv_rows(&path)? {
                if get_field(&row, "definition_id") == definition_id {
                    let name = get_optional(&row, "definition_name")
                        .unwrap_or_else(|| definition_id.to_string());
                    let mut definition = MeasurementDefinition::new(definition_id, name);
                    definition.version = get_optional(&row, "definition_version");
                    return Ok(definition);
                }
            }
        }
        Ok(MeasurementDefinition::new(definition_id, definition_id))
    }
}

impl ConfigStore for CsvConfigStore {
    fn versions(&self, definition_id: &str) -> Result<Vec<ConfigVersionMeta>, ConfigError> {
        // Union across all four tables; a version only publishing bounds rows
        // is still a version.
        let mut seen: BTreeMap<String, ConfigVersionMeta> = BTreeMap::new();
        for name in [
            STANDARD_UNITS_FILE,
            UNIT_MAPPINGS_FILE,
            UNIT_CONVERSIONS_FILE,
            VALUE_BOUNDS_FILE,
        ] {
            let path = self.table_path(name);
            if !path.exists() {
                continue;
            }
            for row in read_csv_rows(&path)? {
                if get_field(&row, "definition_id") != definition_id {
                    continue;
                }
                let config_version = get_field(&row, "config_version");
                if config_version.is_empty() || seen.contains_key(&config_version) {
                    continue;
                }
                let version_datetime =
                    parse_version_datetime(&get_field(&row, "version_datetime"), &path)?;
                seen.insert(
                    config_version.clone(),
                    ConfigVersionMeta {
                        config_id: get_field(&row, "config_id"),
                        config_version,
                        version_datetime,
                    },
                );
            }
        }
        Ok(seen.into_values().collect())
    }

    fn load(&self, definition_id: &str, config_version: &str) -> Result<RuleBundle, ConfigError> {
        let unit_rows = self.version_rows(STANDARD_UNITS_FILE, definition_id, config_version)?;
        if unit_rows.is_empty() {
            return Err(ConfigError::NotFound {
                definition_id: definition_id.to_string(),
                as_of: None,
            });
        }

        let units_path = self.table_path(STANDARD_UNITS_FILE);
        let config_id = get_field(&unit_rows[0], "config_id");
        let version_datetime =
            parse_version_datetime(&get_field(&unit_rows[0], "version_datetime"), &units_path)?;

        let mut standard_units = Vec::new();
        for row in &unit_rows {
            standard_units.push(StandardUnit::new(
                get_field(row, "unit"),
                parse_bool_field(row, "primary_unit_flag", &units_path)?,
            ));
        }

        let mappings_path = self.table_path(UNIT_MAPPINGS_FILE);
        let mut unit_rules = Vec::new();
        for row in self.version_rows(UNIT_MAPPINGS_FILE, definition_id, config_version)? {
            let ordinal_raw = get_field(&row, "ordinal");
            let ordinal = ordinal_raw.parse::<u32>().map_err(|_| {
                ConfigError::table(
                    &mappings_path,
                    format!("invalid ordinal '{ordinal_raw}'"),
                )
            })?;
            let kind: PatternKind = get_field(&row, "match_kind")
                .parse()
                .map_err(|e| ConfigError::table(&mappings_path, format!("{e}")))?;
            unit_rules.push(UnitRule {
                ordinal,
                pattern: get_field(&row, "source_unit_pattern"),
                kind,
                canonical_unit: get_field(&row, "standard_unit"),
            });
        }

        let conversions_path = self.table_path(UNIT_CONVERSIONS_FILE);
        let mut conversion_rules = Vec::new();
        for row in self.version_rows(UNIT_CONVERSIONS_FILE, definition_id, config_version)? {
            let round_dp = match get_optional(&row, "round_dp") {
                Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                    ConfigError::table(&conversions_path, format!("invalid round_dp '{raw}'"))
                })?),
                None => None,
            };
            conversion_rules.push(ConversionRule {
                source_unit: get_field(&row, "source_canonical_unit"),
                target_unit: get_field(&row, "target_unit"),
                pre_offset: parse_f64_field(&row, "pre_offset", &conversions_path)?,
                multiply_by: parse_f64_field(&row, "multiply_by", &conversions_path)?,
                post_offset: parse_f64_field(&row, "post_offset", &conversions_path)?,
                round_dp,
            });
        }

        let bounds_path = self.table_path(VALUE_BOUNDS_FILE);
        let mut bounds_rules = Vec::new();
        for row in self.version_rows(VALUE_BOUNDS_FILE, definition_id, config_version)? {
            let tier: BoundsTier = get_field(&row, "tier")
                .parse()
                .map_err(|e| ConfigError::table(&bounds_path, format!("{e}")))?;
            bounds_rules.push(BoundsRule {
                tier,
                lower_limit: parse_f64_field(&row, "lower_limit", &bounds_path)?,
                lower_inclusive: parse_bool_field(&row, "lower_inclusive", &bounds_path)?,
                upper_limit: parse_f64_field(&row, "upper_limit", &bounds_path)?,
                upper_inclusive: parse_bool_field(&row, "upper_inclusive", &bounds_path)?,
            });
        }

        let mut bundle = RuleBundle {
            definition: self.definition_meta(definition_id)?,
            config_id,
            config_version: config_version.to_string(),
            version_datetime,
            standard_units,
            unit_rules,
            conversion_rules,
            bounds_rules,
        };
        bundle.sort_unit_rules();
        Ok(bundle)
    }
}

/// Parse a version datetime cell. Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`
/// and bare `YYYY-MM-DD` (midnight UTC), the formats that appear in config
/// exports.
fn parse_version_datetime(raw: &str, path: &Path) -> Result<DateTime<Utc>, ConfigError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(ConfigError::table(
        path,
        format!("invalid version_datetime '{raw}'"),
    ))
}
