use serde::{Deserialize, Serialize};

/// A versioned clinical measurement concept (e.g. HbA1c).
///
/// Identity is immutable; behaviour changes only through new versions of the
/// associated rule bundle, never by editing the definition in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementDefinition {
    pub id: String,
    pub name: String,
    /// Version of the definition in the external definition library, when
    /// known. Carried through to output rows for audit provenance.
    pub version: Option<String>,
}

impl MeasurementDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: None,
        }
    }
}

/// One canonical unit declared for a definition.
///
/// Source units map onto this set; exactly one member is flagged primary and
/// acts as the conversion target for the definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardUnit {
    pub unit: String,
    pub primary: bool,
}

impl StandardUnit {
    pub fn new(unit: impl Into<String>, primary: bool) -> Self {
        Self {
            unit: unit.into(),
            primary,
        }
    }
}
