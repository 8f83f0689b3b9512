// src/errors.rs

//! Crate-wide error types.
//!
//! [`PrunError`] covers failures that abort the whole run (bad manifest,
//! unreadable file). Per-command failures are never errors at this level; they
//! are carried as [`CommandFailure`] inside a `CommandOutcome` so one broken
//! command cannot take down its siblings.

use std::io;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrunError {
    #[error("Manifest error: {0}")]
    ManifestError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Why a single command was recorded as failed.
#[derive(Error, Debug)]
pub enum CommandFailure {
    #[error("failed to start process: {0}")]
    Spawn(#[source] io::Error),

    #[error("process timed out after {}s: {command}", .timeout.as_secs_f64())]
    TimedOut { command: String, timeout: Duration },

    #[error("exited with non-zero exit code")]
    NonZeroExit { code: Option<i32> },

    #[error("waiting for process: {0}")]
    Wait(#[source] io::Error),

    #[error("writing process output: {0}")]
    Output(#[source] io::Error),

    #[error("worker stopped before reporting an outcome")]
    WorkerLost,
}

impl CommandFailure {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CommandFailure::TimedOut { .. })
    }
}

pub type Result<T> = std::result::Result<T, PrunError>;
