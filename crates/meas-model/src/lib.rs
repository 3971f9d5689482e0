//! Data model for the measurement standardisation engine.
//!
//! - **definition**: measurement definitions and their canonical units
//! - **rules**: unit mapping, conversion and bounds rule records
//! - **bundle**: the resolved rule set for one definition at one config version
//! - **observation**: raw inbound rows and standardized outbound rows
//! - **summary**: per-run QA counts

pub mod bundle;
pub mod definition;
pub mod error;
pub mod observation;
pub mod rules;
pub mod summary;

pub use bundle::{ConfigVersionMeta, RuleBundle};
pub use definition::{MeasurementDefinition, StandardUnit};
pub use error::ModelError;
pub use observation::{ObservationStatus, RawObservation, StandardizedObservation};
pub use rules::{BoundsRule, BoundsTier, ConversionRule, PatternKind, UnitRule};
pub use summary::RunSummary;
