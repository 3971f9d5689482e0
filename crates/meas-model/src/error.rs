use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown bounds tier: {0}")]
    UnknownTier(String),
    #[error("unknown pattern kind: {0}")]
    UnknownPatternKind(String),
    #[error("unknown observation status: {0}")]
    UnknownStatus(String),
}
