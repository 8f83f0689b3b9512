// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The dispatcher talks to a `CommandRunner` instead of spawning processes
//! itself. Production uses [`ProcessRunner`], which wraps
//! [`run_command`](super::runner::run_command); tests can provide their own
//! runner that records calls and returns canned outcomes.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::exec::runner::run_command;
use crate::exec::sink::Console;
use crate::types::{CommandOutcome, CommandSpec, WorkerId};

/// Trait abstracting how one command is executed by a worker.
pub trait CommandRunner: Send + Sync + 'static {
    /// Run `command` on behalf of `worker` and produce exactly one outcome.
    ///
    /// Must not resolve until whatever the command started has finished.
    fn run<'a>(
        &'a self,
        worker: WorkerId,
        command: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>>;
}

/// Real runner used in production: spawns OS processes and logs their output
/// to the console under the worker's label.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    console: Console,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(console: Console, timeout: Duration) -> Self {
        Self { console, timeout }
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        worker: WorkerId,
        command: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>> {
        let log = self.console.worker(worker);
        let timeout = self.timeout;

        Box::pin(async move { run_command(command, &log, timeout).await })
    }
}
