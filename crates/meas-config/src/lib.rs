//! Versioned config stores and the as-of resolver.
//!
//! Rule configuration is append-only, versioned data. This crate supplies the
//! [`ConfigStore`] seam, a CSV-table store matching the external config
//! tables, an in-memory store for tests and embedders, and the load-time
//! validation that rejects malformed rule sets before a run starts.

pub mod csv_store;
pub mod csv_utils;
pub mod error;
pub mod hash;
pub mod memory;
pub mod store;
pub mod validate;

pub use csv_store::CsvConfigStore;
pub use error::ConfigError;
pub use hash::short_config_id;
pub use memory::{MemoryConfigStore, RuleBundleBuilder};
pub use store::ConfigStore;
pub use validate::validate_bundle;
