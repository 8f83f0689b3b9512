use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use prun::exec::Console;

/// In-memory byte sink usable as a console stream.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

impl CaptureBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Record bodies with the `[id] HH:MM:SS ` prefix removed, paired with the id.
    pub fn records(&self) -> Vec<(usize, String)> {
        self.lines()
            .into_iter()
            .filter_map(|line| {
                let rest = line.strip_prefix('[')?;
                let (id, rest) = rest.split_once("] ")?;
                let (_time, body) = rest.split_once(' ')?;
                Some((id.parse().ok()?, body.to_string()))
            })
            .collect()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A console stream that rejects every write, like a closed pipe.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console closed"))
    }
}

/// A console whose stdout/stderr are captured in memory.
pub struct CapturedConsole {
    pub console: Console,
    pub stdout: CaptureBuffer,
    pub stderr: CaptureBuffer,
}

impl CapturedConsole {
    pub fn new() -> Self {
        let stdout = CaptureBuffer::default();
        let stderr = CaptureBuffer::default();
        let console = Console::new(
            Arc::new(Mutex::new(stdout.clone())),
            Arc::new(Mutex::new(stderr.clone())),
        );
        Self {
            console,
            stdout,
            stderr,
        }
    }

    /// Like [`CapturedConsole::new`], but every stdout write fails.
    ///
    /// `stdout` stays empty; `stderr` captures as usual.
    pub fn with_broken_stdout() -> Self {
        let stdout = CaptureBuffer::default();
        let stderr = CaptureBuffer::default();
        let console = Console::new(
            Arc::new(Mutex::new(BrokenWriter)),
            Arc::new(Mutex::new(stderr.clone())),
        );
        Self {
            console,
            stdout,
            stderr,
        }
    }
}

impl Default for CapturedConsole {
    fn default() -> Self {
        Self::new()
    }
}
