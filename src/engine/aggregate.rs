// src/engine/aggregate.rs

//! Folds per-command outcomes into one run-level verdict.

use tracing::debug;

use crate::errors::CommandFailure;
use crate::types::{CommandOutcome, CommandSpec, WorkerId};

/// Exit code reserved for fatal, run-level errors (e.g. unreadable manifest).
pub const FATAL_EXIT_CODE: i32 = 255;

/// Highest exit code used to report a failure count.
pub const MAX_FAILURE_EXIT_CODE: i32 = 254;

/// A finished command as reported by a worker.
#[derive(Debug)]
pub struct CompletedCommand {
    pub index: usize,
    pub worker: WorkerId,
    pub command: CommandSpec,
    pub outcome: CommandOutcome,
}

/// A command that did not succeed, kept for the final summary.
#[derive(Debug)]
pub struct FailedCommand {
    pub index: usize,
    pub worker: Option<WorkerId>,
    pub command: CommandSpec,
    pub failure: CommandFailure,
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failed { count: usize },
}

/// Collects outcomes from a single owner; workers reach it through a channel.
#[derive(Debug)]
pub struct Aggregator {
    expected: Vec<Option<CommandSpec>>,
    succeeded: usize,
    failed: Vec<FailedCommand>,
}

impl Aggregator {
    /// `commands` are the queued commands, indexed like `CompletedCommand::index`.
    pub fn new(commands: impl IntoIterator<Item = (usize, CommandSpec)>) -> Self {
        let mut expected = Vec::new();
        for (index, command) in commands {
            if expected.len() <= index {
                expected.resize(index + 1, None);
            }
            expected[index] = Some(command);
        }

        Self {
            expected,
            succeeded: 0,
            failed: Vec::new(),
        }
    }

    /// Record one outcome. A second outcome for the same command is ignored.
    pub fn record(&mut self, done: CompletedCommand) {
        let Some(slot) = self.expected.get_mut(done.index) else {
            debug!(index = done.index, "ignoring outcome for unknown command");
            return;
        };
        if slot.take().is_none() {
            debug!(index = done.index, "ignoring duplicate outcome");
            return;
        }

        match done.outcome.failure {
            None => self.succeeded += 1,
            Some(failure) => self.failed.push(FailedCommand {
                index: done.index,
                worker: Some(done.worker),
                command: done.command,
                failure,
            }),
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Close the books. Commands that never reported count as failed.
    pub fn finish(mut self) -> RunSummary {
        let total = self.expected.len();

        for (index, slot) in self.expected.iter_mut().enumerate() {
            if let Some(command) = slot.take() {
                self.failed.push(FailedCommand {
                    index,
                    worker: None,
                    command,
                    failure: CommandFailure::WorkerLost,
                });
            }
        }
        self.failed.sort_by_key(|f| f.index);

        RunSummary {
            total,
            succeeded: self.succeeded,
            failed: self.failed,
        }
    }
}

/// Final tally of a run.
#[derive(Debug)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    /// Failed commands in manifest order.
    pub failed: Vec<FailedCommand>,
}

impl RunSummary {
    pub fn empty() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failed: Vec::new(),
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn verdict(&self) -> Verdict {
        match self.failure_count() {
            0 => Verdict::Success,
            count => Verdict::Failed { count },
        }
    }

    /// Process exit status: 0 on success, otherwise the failure count capped
    /// below [`FATAL_EXIT_CODE`].
    pub fn exit_code(&self) -> i32 {
        match self.verdict() {
            Verdict::Success => 0,
            Verdict::Failed { count } => {
                i32::try_from(count).map_or(MAX_FAILURE_EXIT_CODE, |c| c.min(MAX_FAILURE_EXIT_CODE))
            }
        }
    }
}
