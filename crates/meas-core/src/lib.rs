//! Batch orchestration for measurement standardisation.
//!
//! A run takes one definition's raw observations through three passes
//! (classify, convert, validate) against a rule bundle resolved exactly
//! once, then publishes the whole batch atomically through a [`CommitSink`].
//! Rows never fail a run; configuration does.

pub mod error;
pub mod run;
pub mod shard;
pub mod sink;
pub mod state;

pub use error::RunError;
pub use run::{RunOptions, RunReport, execute_run};
pub use shard::map_sharded;
pub use sink::{CommitSink, MemorySink};
pub use state::RunState;
