//! CLI argument definitions for the standardisation batch job.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "meas",
    version,
    about = "Measurement standardisation engine - classify, convert and validate clinical measurements",
    long_about = "Standardise raw clinical measurement batches against versioned rule bundles.\n\n\
                  Each run classifies free-text units onto canonical units, converts values\n\
                  into the definition's standard unit, checks plausibility bounds, and\n\
                  publishes the batch atomically with full config provenance."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row-level clinical values in trace logs.
    ///
    /// Off by default: raw result values are redacted from log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one definition's batch from raw observations to published output.
    Run(RunArgs),

    /// List published config versions for a definition.
    Versions(VersionsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Definition id to standardise (e.g. hba1c_definition_gp).
    #[arg(long = "definition", value_name = "ID")]
    pub definition: String,

    /// Resolve config as of this instant (RFC 3339 or YYYY-MM-DD).
    ///
    /// Defaults to the latest published version. Use this to reproduce a
    /// historical run exactly, regardless of versions published since.
    #[arg(long = "as-of", value_name = "TIMESTAMP")]
    pub as_of: Option<String>,

    /// Directory holding the versioned config tables.
    #[arg(long = "config", value_name = "DIR")]
    pub config: PathBuf,

    /// CSV export of raw observations.
    #[arg(long = "observations", value_name = "CSV")]
    pub observations: PathBuf,

    /// Output directory for the published batch.
    #[arg(long = "out", value_name = "DIR")]
    pub out: PathBuf,

    /// Worker threads for the transform passes.
    ///
    /// Output is identical for any value; this only affects wall-clock time.
    #[arg(long = "workers", value_name = "N", default_value_t = 1)]
    pub workers: usize,
}

#[derive(Parser)]
pub struct VersionsArgs {
    /// Definition id to inspect.
    #[arg(long = "definition", value_name = "ID")]
    pub definition: String,

    /// Directory holding the versioned config tables.
    #[arg(long = "config", value_name = "DIR")]
    pub config: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
