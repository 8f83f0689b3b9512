// src/exec/line_buffer.rs

//! Byte stream → whole-line records.
//!
//! Child processes write to their pipes in arbitrary chunks. [`LineBuffer`]
//! sits between the pipe and a [`LineSink`], holding back any trailing partial
//! line so that every record reaching the sink is either a complete
//! `\n`-terminated line or (on flush) the final unterminated remainder.

use std::io;

/// Destination for complete line records.
pub trait LineSink: Send {
    /// Emit one record. `line` includes its trailing `\n` unless it is the
    /// final partial line forced out by a flush.
    fn write_line(&mut self, line: &[u8]) -> io::Result<()>;
}

/// `io::Write` adapter that forwards only complete lines to its sink.
///
/// Invariant: `pending` never contains a `\n`.
#[derive(Debug)]
pub struct LineBuffer<S: LineSink> {
    sink: S,
    pending: Vec<u8>,
}

impl<S: LineSink> LineBuffer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            pending: Vec::new(),
        }
    }

    /// Bytes of the current partial line.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Flush the remaining partial line and hand back the sink.
    pub fn into_inner(mut self) -> io::Result<S> {
        io::Write::flush(&mut self)?;
        Ok(self.sink)
    }
}

impl<S: LineSink> io::Write for LineBuffer<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut rest = buf;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let (line, tail) = rest.split_at(pos + 1);
            rest = tail;

            if self.pending.is_empty() {
                self.sink.write_line(line)?;
            } else {
                let mut record = std::mem::take(&mut self.pending);
                record.extend_from_slice(line);
                self.sink.write_line(&record)?;
            }
        }
        self.pending.extend_from_slice(rest);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let record = std::mem::take(&mut self.pending);
        self.sink.write_line(&record)
    }
}
