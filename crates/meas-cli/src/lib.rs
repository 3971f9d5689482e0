//! CLI library components for the measurement standardisation batch job.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
