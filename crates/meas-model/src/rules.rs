//! Rule records as loaded from a config store.
//!
//! All three rule kinds are append-only, versioned data: edits in the
//! authoring tool produce a new config version, never an in-place mutation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// How a unit rule's pattern is matched against a raw unit string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Case-insensitive substring containment.
    #[default]
    Substring,
    /// Case-insensitive regular expression search.
    Regex,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Substring => "substring",
            PatternKind::Regex => "regex",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternKind {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            // Blank cells in UNIT_MAPPINGS default to substring matching.
            "" | "substring" => Ok(PatternKind::Substring),
            "regex" => Ok(PatternKind::Regex),
            other => Err(ModelError::UnknownPatternKind(other.to_string())),
        }
    }
}

/// One entry in a definition's ordered unit decision list.
///
/// Rules are evaluated ordinal-ascending and the first match wins. Ordering
/// is the only disambiguation mechanism for overlapping patterns; authors put
/// specific patterns before general ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRule {
    pub ordinal: u32,
    pub pattern: String,
    #[serde(default)]
    pub kind: PatternKind,
    pub canonical_unit: String,
}

impl UnitRule {
    pub fn substring(ordinal: u32, pattern: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            ordinal,
            pattern: pattern.into(),
            kind: PatternKind::Substring,
            canonical_unit: unit.into(),
        }
    }

    pub fn regex(ordinal: u32, pattern: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            ordinal,
            pattern: pattern.into(),
            kind: PatternKind::Regex,
            canonical_unit: unit.into(),
        }
    }
}

/// An affine conversion from one canonical unit to the definition's target.
///
/// `converted = (raw + pre_offset) * multiply_by + post_offset`. Identity
/// conversions are explicit rows (0, 1, 0); the converter never infers them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRule {
    pub source_unit: String,
    pub target_unit: String,
    pub pre_offset: f64,
    pub multiply_by: f64,
    pub post_offset: f64,
    /// Optional rounding of the converted value to this many decimal places.
    /// Absent means no rounding is applied.
    #[serde(default)]
    pub round_dp: Option<u32>,
}

impl ConversionRule {
    pub fn new(
        source_unit: impl Into<String>,
        target_unit: impl Into<String>,
        pre_offset: f64,
        multiply_by: f64,
        post_offset: f64,
    ) -> Self {
        Self {
            source_unit: source_unit.into(),
            target_unit: target_unit.into(),
            pre_offset,
            multiply_by,
            post_offset,
            round_dp: None,
        }
    }

    /// Explicit identity conversion for a unit already expressed in the target.
    pub fn identity(unit: impl Into<String> + Clone) -> Self {
        Self::new(unit.clone(), unit, 0.0, 1.0, 0.0)
    }

    pub fn with_round_dp(mut self, dp: u32) -> Self {
        self.round_dp = Some(dp);
        self
    }
}

/// Plausibility tier a bounds rule belongs to.
///
/// The two tiers are configured independently; `Possible` is not guaranteed
/// to be a superset of `Confidence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundsTier {
    Confidence,
    Possible,
}

impl BoundsTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundsTier::Confidence => "confidence",
            BoundsTier::Possible => "possible",
        }
    }
}

impl fmt::Display for BoundsTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundsTier {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "confidence" => Ok(BoundsTier::Confidence),
            "possible" => Ok(BoundsTier::Possible),
            other => Err(ModelError::UnknownTier(other.to_string())),
        }
    }
}

/// Value range for one plausibility tier.
///
/// Source cutoffs mix strict and non-strict comparisons across measurement
/// types, so inclusivity is an explicit per-bound flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsRule {
    pub tier: BoundsTier,
    pub lower_limit: f64,
    pub lower_inclusive: bool,
    pub upper_limit: f64,
    pub upper_inclusive: bool,
}

impl BoundsRule {
    /// Closed interval `[lower, upper]`.
    pub fn inclusive(tier: BoundsTier, lower: f64, upper: f64) -> Self {
        Self {
            tier,
            lower_limit: lower,
            lower_inclusive: true,
            upper_limit: upper,
            upper_inclusive: true,
        }
    }

    /// True when `value` falls inside the configured interval.
    pub fn contains(&self, value: f64) -> bool {
        let above_lower = if self.lower_inclusive {
            value >= self.lower_limit
        } else {
            value > self.lower_limit
        };
        let below_upper = if self.upper_inclusive {
            value <= self.upper_limit
        } else {
            value < self.upper_limit
        };
        above_lower && below_upper
    }
}
