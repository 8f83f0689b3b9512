// src/exec/runner.rs

//! Runs one command to completion or forced termination.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::CommandFailure;
use crate::exec::line_buffer::{LineBuffer, LineSink};
use crate::exec::sink::WorkerLog;
use crate::types::{CommandOutcome, CommandSpec};

const READ_CHUNK: usize = 8 * 1024;

/// Minimum time output pipes may stay open once the child itself is gone.
///
/// Grandchildren that inherited the pipes are not signalled, so without this
/// bound they could hold the worker long past the command's timeout.
pub const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Which side of the exit/timeout race finished first.
#[derive(Debug)]
enum Completion {
    Exited(io::Result<ExitStatus>),
    TimedOut,
}

type SharedBuffer<S> = Arc<Mutex<LineBuffer<S>>>;

/// A running copy task plus the buffer it writes into, which stays reachable
/// so the trailing partial line can be flushed even if the task is aborted.
struct Pump<S: LineSink> {
    buffer: SharedBuffer<S>,
    handle: JoinHandle<io::Result<()>>,
}

/// How an output pump ended.
#[derive(Debug)]
enum Drain {
    Finished(io::Result<()>),
    /// The pipe was still open at the drain deadline.
    Cut(io::Result<()>),
}

/// Execute `spec`, streaming its output through the worker's labeled sinks.
///
/// Never returns while the child is still alive: a timed-out child is killed
/// and then reaped before the outcome is produced. Output pipes are drained
/// until EOF or the drain deadline, and partial lines are always flushed.
pub async fn run_command(
    spec: &CommandSpec,
    log: &WorkerLog,
    timeout: Duration,
) -> CommandOutcome {
    let mut announce = log.stdout.clone();
    if let Err(e) = announce.message(&format!("--> {spec}")) {
        warn!(worker = %log.id, error = %e, "failed to write start announcement");
    }

    let outcome = execute(spec, log, timeout).await;

    if let Some(failure) = outcome.failure_reason() {
        let mut stderr = log.stderr.clone();
        if let Err(e) = stderr.message(&format!("error: {failure}")) {
            warn!(worker = %log.id, error = %e, "failed to write failure message");
        }
    }

    outcome
}

async fn execute(spec: &CommandSpec, log: &WorkerLog, timeout: Duration) -> CommandOutcome {
    info!(worker = %log.id, command = %spec, "starting command process");

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(worker = %log.id, command = %spec, error = %e, "failed to spawn process");
            return CommandOutcome::failed(CommandFailure::Spawn(e));
        }
    };
    let deadline = Instant::now() + timeout;

    let stdout_pump = child
        .stdout
        .take()
        .map(|out| spawn_pump(out, LineBuffer::new(log.stdout.clone())));
    let stderr_pump = child
        .stderr
        .take()
        .map(|err| spawn_pump(err, LineBuffer::new(log.stderr.clone())));

    // Single resolution point: whichever branch wins decides the outcome and
    // the other future is dropped.
    let completion = tokio::select! {
        status = child.wait() => Completion::Exited(status),
        _ = tokio::time::sleep_until(deadline) => Completion::TimedOut,
    };

    let timed_out = || CommandFailure::TimedOut {
        command: spec.to_string(),
        timeout,
    };

    let (mut failure, drain_deadline) = match completion {
        Completion::Exited(Ok(status)) => {
            debug!(worker = %log.id, command = %spec, code = ?status.code(), "process exited");
            let failure = if status.success() {
                None
            } else {
                Some(CommandFailure::NonZeroExit {
                    code: status.code(),
                })
            };
            (failure, deadline.max(Instant::now() + DRAIN_GRACE))
        }
        Completion::Exited(Err(e)) => (
            Some(CommandFailure::Wait(e)),
            deadline.max(Instant::now() + DRAIN_GRACE),
        ),
        Completion::TimedOut => {
            warn!(
                worker = %log.id,
                command = %spec,
                timeout_secs = timeout.as_secs_f64(),
                "command timed out; killing process"
            );
            if let Err(e) = child.start_kill() {
                warn!(worker = %log.id, error = %e, "failed to signal timed-out process");
            }
            // Reap the child; its exit status no longer matters.
            if let Err(e) = child.wait().await {
                warn!(worker = %log.id, error = %e, "failed to reap timed-out process");
            }
            (Some(timed_out()), Instant::now() + DRAIN_GRACE)
        }
    };

    for pump in [stdout_pump, stderr_pump].into_iter().flatten() {
        let res = match join_pump(pump, drain_deadline).await {
            Drain::Finished(res) => res,
            Drain::Cut(res) => {
                warn!(
                    worker = %log.id,
                    command = %spec,
                    "output pipe still open at deadline; abandoning it"
                );
                // The process exited in time but something it started kept
                // writing past the timeout.
                if failure.is_none() {
                    failure = Some(timed_out());
                }
                res
            }
        };
        if let Err(e) = res {
            warn!(
                worker = %log.id,
                command = %spec,
                error = %e,
                "process output was not fully logged"
            );
            if failure.is_none() {
                failure = Some(CommandFailure::Output(e));
            }
        }
    }

    match failure {
        None => CommandOutcome::success(),
        Some(f) => CommandOutcome::failed(f),
    }
}

fn spawn_pump<R, S>(reader: R, buffer: LineBuffer<S>) -> Pump<S>
where
    R: AsyncRead + Unpin + Send + 'static,
    S: LineSink + 'static,
{
    let buffer = Arc::new(Mutex::new(buffer));
    let handle = tokio::spawn(pump(reader, Arc::clone(&buffer)));
    Pump { buffer, handle }
}

/// Wait for a pump until `deadline`; past it, abort the task and flush
/// whatever partial line it had buffered.
async fn join_pump<S: LineSink>(pump: Pump<S>, deadline: Instant) -> Drain {
    let Pump { buffer, mut handle } = pump;

    let joined = tokio::time::timeout_at(deadline, &mut handle).await;
    match joined {
        Ok(Ok(res)) => Drain::Finished(res),
        Ok(Err(join_err)) => Drain::Finished(Err(io::Error::other(join_err))),
        Err(_) => {
            handle.abort();
            // Wait for the abort to land so nothing else touches the buffer.
            let _ = handle.await;
            Drain::Cut(flush_shared(&buffer))
        }
    }
}

fn with_buffer<S, T>(
    buffer: &SharedBuffer<S>,
    f: impl FnOnce(&mut LineBuffer<S>) -> io::Result<T>,
) -> io::Result<T>
where
    S: LineSink,
{
    let mut guard = buffer
        .lock()
        .map_err(|_| io::Error::other("line buffer mutex poisoned"))?;
    f(&mut *guard)
}

fn flush_shared<S: LineSink>(buffer: &SharedBuffer<S>) -> io::Result<()> {
    with_buffer(buffer, |buf| io::Write::flush(buf))
}

/// Copy `reader` into `buffer` until EOF, then flush the trailing partial line.
///
/// A sink error is remembered but reading continues, so the child never
/// stalls on a full pipe because its log destination went away.
async fn pump<R, S>(mut reader: R, buffer: SharedBuffer<S>) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    S: LineSink,
{
    let mut chunk = vec![0u8; READ_CHUNK];
    let mut first_err: Option<io::Error> = None;

    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                first_err = first_err.or(Some(e));
                break;
            }
        };
        if first_err.is_none() {
            if let Err(e) = with_buffer(&buffer, |buf| io::Write::write_all(buf, &chunk[..n])) {
                first_err = Some(e);
            }
        }
    }

    if let Err(e) = flush_shared(&buffer) {
        first_err = first_err.or(Some(e));
    }

    match first_err {
        None => Ok(()),
        Some(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Shared(Arc<Mutex<Vec<Vec<u8>>>>);

    impl LineSink for Shared {
        fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
            self.0.lock().unwrap().push(line.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn pump_splits_lines_and_flushes_tail() {
        let sink = Shared::default();
        let input: &[u8] = b"first\nsecond\ntail";
        let buffer = Arc::new(Mutex::new(LineBuffer::new(sink.clone())));
        pump(input, buffer).await.unwrap();

        let records = sink.0.lock().unwrap().clone();
        assert_eq!(
            records,
            vec![b"first\n".to_vec(), b"second\n".to_vec(), b"tail".to_vec()]
        );
    }

    #[tokio::test]
    async fn pump_keeps_draining_after_sink_error() {
        struct Failing;
        impl LineSink for Failing {
            fn write_line(&mut self, _line: &[u8]) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            }
        }

        let input: &[u8] = b"a\nb\nc\n";
        let buffer = Arc::new(Mutex::new(LineBuffer::new(Failing)));
        let err = pump(input, buffer).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}

