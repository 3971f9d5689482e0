//! The config store seam and the as-of resolver.

use chrono::{DateTime, Utc};

use meas_model::{ConfigVersionMeta, RuleBundle};

use crate::error::ConfigError;
use crate::validate::validate_bundle;

/// A source of versioned rule bundles.
///
/// Implementations enumerate published versions and load one bundle; version
/// selection and load-time validation are shared via [`ConfigStore::resolve`].
/// Rule records are append-only: a store never mutates a published version.
pub trait ConfigStore {
    /// All published config versions for a definition, in any order.
    fn versions(&self, definition_id: &str) -> Result<Vec<ConfigVersionMeta>, ConfigError>;

    /// Load the bundle for one specific published version.
    fn load(&self, definition_id: &str, config_version: &str) -> Result<RuleBundle, ConfigError>;

    /// Resolve the rule bundle for a definition at a point in time.
    ///
    /// `as_of = None` selects the greatest version currently published;
    /// `as_of = Some(t)` selects the greatest version whose
    /// `version_datetime <= t`, so historical reprocessing is reproducible
    /// regardless of how many newer versions have been published since.
    ///
    /// The returned bundle has passed load-time validation and has its unit
    /// rules sorted by ordinal.
    fn resolve(
        &self,
        definition_id: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<RuleBundle, ConfigError> {
        let mut versions = self.versions(definition_id)?;
        if let Some(cutoff) = as_of {
            versions.retain(|v| v.version_datetime <= cutoff);
        }
        // Total order: datetime, then version string for equal timestamps.
        versions.sort_by(|a, b| {
            a.version_datetime
                .cmp(&b.version_datetime)
                .then_with(|| a.config_version.cmp(&b.config_version))
        });
        let selected = versions.pop().ok_or_else(|| ConfigError::NotFound {
            definition_id: definition_id.to_string(),
            as_of,
        })?;

        tracing::debug!(
            definition_id,
            config_version = %selected.config_version,
            version_datetime = %selected.version_datetime,
            "resolved config version"
        );

        let mut bundle = self.load(definition_id, &selected.config_version)?;
        bundle.sort_unit_rules();
        validate_bundle(&bundle)?;
        Ok(bundle)
    }
}
