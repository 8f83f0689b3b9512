// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`line_buffer`] turns raw output chunks into whole-line records.
//! - [`sink`] provides the worker-labeled, timestamped record sinks.
//! - [`runner`] runs a single command with a timeout and produces its outcome.
//! - [`backend`] provides the `CommandRunner` trait and the production
//!   `ProcessRunner`, which tests can replace with a fake implementation.

pub mod backend;
pub mod line_buffer;
pub mod runner;
pub mod sink;

pub use backend::{CommandRunner, ProcessRunner};
pub use line_buffer::{LineBuffer, LineSink};
pub use runner::{DRAIN_GRACE, run_command};
pub use sink::{Console, PrefixedSink, SharedWriter, WorkerLog};
