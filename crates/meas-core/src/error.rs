use thiserror::Error;

use meas_config::ConfigError;
use meas_transform::TransformError;

/// Run-fatal errors. Per-row failures are never represented here; they are
/// data carried in each row's status field.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The resolved bundle could not be compiled into engines. Load-time
    /// validation makes this unreachable for store-resolved bundles.
    #[error("failed to build engines from resolved config: {0}")]
    Engine(#[from] TransformError),

    #[error("failed to commit run output: {0}")]
    Commit(#[source] anyhow::Error),
}
