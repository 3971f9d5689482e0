use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The canonical unit classified but the config declares no conversion
    /// for it. Identity conversions are explicit rows, never inferred, so
    /// this is a real configuration gap surfaced per row.
    #[error("no conversion rule for canonical unit '{unit}'")]
    NoConversionRule { unit: String },

    /// A regex unit rule failed to compile. Resolved configs are validated
    /// before a run starts, so hitting this means the bundle bypassed the
    /// config store.
    #[error("invalid unit rule pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
