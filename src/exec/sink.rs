// src/exec/sink.rs

//! Labeled log sinks shared by all workers.
//!
//! Every record is written as `[<worker>] HH:MM:SS <line>` with a single
//! `write_all` while the destination's mutex is held, so records from
//! different workers can interleave with each other but never tear.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use chrono::Local;

use crate::exec::line_buffer::LineSink;
use crate::types::WorkerId;

/// A writer shared between workers.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// The two destinations every worker logs to.
#[derive(Clone)]
pub struct Console {
    pub stdout: SharedWriter,
    pub stderr: SharedWriter,
}

impl Console {
    /// The runner's own standard output and standard error.
    pub fn stdio() -> Self {
        Self {
            stdout: Arc::new(Mutex::new(io::stdout())),
            stderr: Arc::new(Mutex::new(io::stderr())),
        }
    }

    pub fn new(stdout: SharedWriter, stderr: SharedWriter) -> Self {
        Self { stdout, stderr }
    }

    /// Sinks labeled for one worker.
    pub fn worker(&self, id: WorkerId) -> WorkerLog {
        WorkerLog {
            id,
            stdout: PrefixedSink::new(id, Arc::clone(&self.stdout)),
            stderr: PrefixedSink::new(id, Arc::clone(&self.stderr)),
        }
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

/// A [`LineSink`] that stamps each record with a worker label and time.
#[derive(Clone)]
pub struct PrefixedSink {
    prefix: String,
    out: SharedWriter,
}

impl PrefixedSink {
    pub fn new(id: WorkerId, out: SharedWriter) -> Self {
        Self {
            prefix: format!("[{id}] "),
            out,
        }
    }

    /// Write a runner-level message (not process output) as one record.
    pub fn message(&mut self, msg: &str) -> io::Result<()> {
        self.write_line(msg.as_bytes())
    }
}

impl fmt::Debug for PrefixedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixedSink")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl LineSink for PrefixedSink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        let stamp = Local::now().format("%H:%M:%S").to_string();

        let mut record = Vec::with_capacity(self.prefix.len() + stamp.len() + line.len() + 2);
        record.extend_from_slice(self.prefix.as_bytes());
        record.extend_from_slice(stamp.as_bytes());
        record.push(b' ');
        record.extend_from_slice(line);
        if !line.ends_with(b"\n") {
            record.push(b'\n');
        }

        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("log writer mutex poisoned"))?;
        out.write_all(&record)?;
        out.flush()
    }
}

/// Labeled stdout/stderr sinks for one worker.
#[derive(Debug, Clone)]
pub struct WorkerLog {
    pub id: WorkerId,
    pub stdout: PrefixedSink,
    pub stderr: PrefixedSink,
}
