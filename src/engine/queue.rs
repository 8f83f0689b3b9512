// src/engine/queue.rs

//! Shared work queue for the worker pool.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::types::CommandSpec;

/// A command waiting to be picked up, tagged with its manifest position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedCommand {
    pub index: usize,
    pub command: CommandSpec,
}

/// Ordered queue filled once up front and drained concurrently by workers.
///
/// `next` hands out commands strictly in insertion order; each command is
/// handed out exactly once.
#[derive(Debug)]
pub struct WorkQueue {
    pending: Mutex<VecDeque<QueuedCommand>>,
    total: usize,
}

impl WorkQueue {
    /// Build the queue, appending `extra_args` to every command.
    pub fn new(commands: Vec<CommandSpec>, extra_args: &[String]) -> Self {
        let pending: VecDeque<QueuedCommand> = commands
            .into_iter()
            .enumerate()
            .map(|(index, command)| QueuedCommand {
                index,
                command: command.with_extra_args(extra_args),
            })
            .collect();
        let total = pending.len();

        Self {
            pending: Mutex::new(pending),
            total,
        }
    }

    /// Take the next command, or `None` once the queue is exhausted.
    pub fn next(&self) -> Option<QueuedCommand> {
        // pop_front cannot leave the deque half-updated, so poisoning is benign.
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        pending.pop_front()
    }

    /// Number of commands originally queued.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Indexed copies of the commands still waiting.
    pub fn snapshot(&self) -> Vec<(usize, CommandSpec)> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|item| (item.index, item.command.clone()))
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_out_in_order_with_extra_args() {
        let queue = WorkQueue::new(
            vec![CommandSpec::new("a"), CommandSpec::new("b").arg("x")],
            &["--fast".to_string()],
        );
        assert_eq!(queue.total(), 2);
        assert_eq!(queue.snapshot()[1].1.args, vec!["x", "--fast"]);

        let first = queue.next().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.command, CommandSpec::new("a").arg("--fast"));

        let second = queue.next().unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.command.args, vec!["x", "--fast"]);

        assert!(queue.next().is_none());
        assert_eq!(queue.remaining(), 0);
    }

    #[test]
    fn empty_queue_is_immediately_exhausted() {
        let queue = WorkQueue::new(Vec::new(), &[]);
        assert_eq!(queue.total(), 0);
        assert!(queue.next().is_none());
    }
}
