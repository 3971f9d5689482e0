//! In-process config store.
//!
//! Used by tests and by embedders that assemble rule bundles from their own
//! storage. Publishing is append-only, mirroring how the authoring tool
//! writes new config versions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use meas_model::{
    BoundsRule, ConfigVersionMeta, ConversionRule, MeasurementDefinition, RuleBundle,
    StandardUnit, UnitRule,
};

use crate::error::ConfigError;
use crate::hash::short_config_id;
use crate::store::ConfigStore;

/// Incrementally assembles a [`RuleBundle`].
#[derive(Debug, Clone)]
pub struct RuleBundleBuilder {
    definition: MeasurementDefinition,
    config_id: Option<String>,
    config_version: Option<String>,
    version_datetime: DateTime<Utc>,
    standard_units: Vec<StandardUnit>,
    unit_rules: Vec<UnitRule>,
    conversion_rules: Vec<ConversionRule>,
    bounds_rules: Vec<BoundsRule>,
}

impl RuleBundleBuilder {
    pub fn new(definition_id: impl Into<String>, definition_name: impl Into<String>) -> Self {
        Self {
            definition: MeasurementDefinition::new(definition_id, definition_name),
            config_id: None,
            config_version: None,
            version_datetime: DateTime::<Utc>::UNIX_EPOCH,
            standard_units: Vec::new(),
            unit_rules: Vec::new(),
            conversion_rules: Vec::new(),
            bounds_rules: Vec::new(),
        }
    }

    pub fn definition_version(mut self, version: impl Into<String>) -> Self {
        self.definition.version = Some(version.into());
        self
    }

    pub fn config_id(mut self, id: impl Into<String>) -> Self {
        self.config_id = Some(id.into());
        self
    }

    /// Sets the version label and its publication datetime.
    pub fn version(mut self, label: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.config_version = Some(label.into());
        self.version_datetime = at;
        self
    }

    pub fn standard_unit(mut self, unit: impl Into<String>, primary: bool) -> Self {
        self.standard_units.push(StandardUnit::new(unit, primary));
        self
    }

    pub fn unit_rule(mut self, rule: UnitRule) -> Self {
        self.unit_rules.push(rule);
        self
    }

    pub fn conversion(mut self, rule: ConversionRule) -> Self {
        self.conversion_rules.push(rule);
        self
    }

    pub fn bounds(mut self, rule: BoundsRule) -> Self {
        self.bounds_rules.push(rule);
        self
    }

    /// Finalizes the bundle. When no config id was supplied a short
    /// content-addressed one is derived from the definition; when no version
    /// label was supplied one is derived from the definition name and the
    /// version datetime, the format the authoring tool uses.
    pub fn build(self) -> RuleBundle {
        let config_id = self
            .config_id
            .unwrap_or_else(|| short_config_id(&self.definition.name, &self.definition.id));
        let config_version = self.config_version.unwrap_or_else(|| {
            format!(
                "{}_{}",
                self.definition.name,
                self.version_datetime.format("%Y%m%d_%H%M%S")
            )
        });
        let mut bundle = RuleBundle {
            definition: self.definition,
            config_id,
            config_version,
            version_datetime: self.version_datetime,
            standard_units: self.standard_units,
            unit_rules: self.unit_rules,
            conversion_rules: self.conversion_rules,
            bounds_rules: self.bounds_rules,
        };
        bundle.sort_unit_rules();
        bundle
    }
}

/// Append-only in-memory store of published bundles.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    bundles: BTreeMap<String, Vec<RuleBundle>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a bundle as a new config version for its definition.
    pub fn publish(&mut self, bundle: RuleBundle) {
        self.bundles
            .entry(bundle.definition.id.clone())
            .or_default()
            .push(bundle);
    }

    pub fn with_bundle(mut self, bundle: RuleBundle) -> Self {
        self.publish(bundle);
        self
    }
}

impl ConfigStore for MemoryConfigStore {
    fn versions(&self, definition_id: &str) -> Result<Vec<ConfigVersionMeta>, ConfigError> {
        Ok(self
            .bundles
            .get(definition_id)
            .map(|bundles| {
                bundles
                    .iter()
                    .map(|b| ConfigVersionMeta {
                        config_id: b.config_id.clone(),
                        config_version: b.config_version.clone(),
                        version_datetime: b.version_datetime,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn load(&self, definition_id: &str, config_version: &str) -> Result<RuleBundle, ConfigError> {
        self.bundles
            .get(definition_id)
            .and_then(|bundles| {
                bundles
                    .iter()
                    .find(|b| b.config_version == config_version)
            })
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                definition_id: definition_id.to_string(),
                as_of: None,
            })
    }
}
