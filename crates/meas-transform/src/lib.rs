//! Unit classification and conversion engines.
//!
//! Both engines are interpreters over rule data resolved from a config
//! store: there is no per-measurement-type code anywhere in this crate.
//! Given the same input and the same resolved bundle they always produce
//! the same output.

pub mod classify;
pub mod convert;
pub mod error;
pub mod numeric;

pub use classify::UnitClassifier;
pub use convert::{Converted, UnitConverter};
pub use error::TransformError;
pub use numeric::parse_result_value;
