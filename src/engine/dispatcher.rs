// src/engine/dispatcher.rs

//! Bounded worker pool.
//!
//! The dispatcher starts exactly `concurrency` long-lived workers. Each worker
//! repeatedly takes the next command from the shared [`WorkQueue`], runs it
//! through the [`CommandRunner`], and sends the outcome to the single
//! aggregating loop in [`Dispatcher::run`]. Since a worker only takes a new
//! command after the previous one has resolved, no more than `concurrency`
//! commands are ever in flight.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::exec::CommandRunner;
use crate::types::{CommandSpec, DEFAULT_CONCURRENCY, RunOptions, WorkerId};

use super::aggregate::{Aggregator, CompletedCommand, RunSummary};
use super::queue::WorkQueue;

/// Pool configuration, passed explicitly at construction.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub concurrency: NonZeroUsize,
    /// Appended to every queued command.
    pub extra_args: Vec<String>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            extra_args: Vec::new(),
        }
    }
}

impl From<&RunOptions> for DispatchOptions {
    fn from(opts: &RunOptions) -> Self {
        Self {
            concurrency: opts.concurrency,
            extra_args: opts.extra_args.clone(),
        }
    }
}

#[derive(Debug)]
pub struct Dispatcher<R: CommandRunner> {
    runner: Arc<R>,
    options: DispatchOptions,
}

impl<R: CommandRunner> Dispatcher<R> {
    pub fn new(runner: R, options: DispatchOptions) -> Self {
        Self {
            runner: Arc::new(runner),
            options,
        }
    }

    /// Run every command and return once each one has an outcome.
    pub async fn run(&self, commands: Vec<CommandSpec>) -> RunSummary {
        let queue = Arc::new(WorkQueue::new(commands, &self.options.extra_args));
        let total = queue.total();
        let workers = self.options.concurrency.get();

        info!(commands = total, workers, "dispatching commands");

        let mut aggregator = Aggregator::new(queue.snapshot());

        let (result_tx, mut result_rx) = mpsc::channel::<CompletedCommand>(workers);
        let mut pool = JoinSet::new();
        for id in 1..=workers {
            pool.spawn(worker_loop(
                WorkerId(id),
                Arc::clone(&queue),
                Arc::clone(&self.runner),
                result_tx.clone(),
            ));
        }
        // The channel closes once every worker has dropped its sender.
        drop(result_tx);

        while let Some(done) = result_rx.recv().await {
            aggregator.record(done);
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "worker task ended abnormally");
            }
        }

        let summary = aggregator.finish();
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failure_count(),
            "all commands finished"
        );
        summary
    }
}

async fn worker_loop<R: CommandRunner>(
    worker: WorkerId,
    queue: Arc<WorkQueue>,
    runner: Arc<R>,
    results: mpsc::Sender<CompletedCommand>,
) {
    debug!(%worker, "worker started");

    while let Some(item) = queue.next() {
        debug!(%worker, index = item.index, command = %item.command, "worker picked command");
        let outcome = runner.run(worker, &item.command).await;

        let done = CompletedCommand {
            index: item.index,
            worker,
            command: item.command,
            outcome,
        };
        if results.send(done).await.is_err() {
            error!(%worker, "result channel closed; stopping worker");
            break;
        }
    }

    debug!(%worker, "worker finished (queue exhausted)");
}
