// src/engine/mod.rs

//! Orchestration engine for prun.
//!
//! - [`queue`]: the ordered work queue shared by all workers.
//! - [`dispatcher`]: the bounded pool of long-lived workers.
//! - [`aggregate`]: folds outcomes into a run summary and exit status.

pub mod aggregate;
pub mod dispatcher;
pub mod queue;

pub use aggregate::{
    Aggregator, CompletedCommand, FATAL_EXIT_CODE, FailedCommand, RunSummary, Verdict,
};
pub use dispatcher::{DispatchOptions, Dispatcher};
pub use queue::{QueuedCommand, WorkQueue};
