//! Tabular adapters at the engine's edges.
//!
//! Inbound, the Observation Source is consumed as CSV exports; outbound,
//! standardized batches are published as CSV with rename-into-place
//! atomicity. The engine itself never touches files; these adapters are the
//! only code that does.

pub mod error;
pub mod observations;
pub mod publish;

pub use error::IngestError;
pub use observations::{read_observations_csv, read_observations_for};
pub use publish::{CsvRunSink, write_standardized_csv};
