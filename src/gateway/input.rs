//! Request-body read adapter over the host's blocking byte source.

use crate::host::HostInput;
use bytes::Bytes;
use std::io;

/// Chunk size for unbounded reads.
const READ_CHUNK: usize = 8192;

/// Increment size for unbounded line reads. A tradeoff, not a protocol
/// requirement; lines are assumed to usually fit in one increment.
const LINE_CHUNK: usize = 512;

/// The input-stream adapter exposed to applications via the environ.
///
/// Wraps the host's blocking, seek-less byte source with the convention's
/// read/readline interface. End-of-stream is reported as an empty result,
/// never an error; host I/O failures propagate unchanged.
pub struct GatewayInput {
    source: Box<dyn HostInput + Send>,
}

impl GatewayInput {
    /// Wrap a host input source.
    pub fn new(source: Box<dyn HostInput + Send>) -> Self {
        Self { source }
    }

    /// Read body bytes.
    ///
    /// Unbounded (`size` of `None`) accumulates fixed-size chunks until
    /// the source reports end-of-stream. Bounded issues exactly one
    /// underlying read and returns what it got, which may be shorter than
    /// requested near end-of-stream.
    pub fn read(&mut self, size: Option<usize>) -> io::Result<Bytes> {
        match size {
            None => {
                let mut out = Vec::new();
                let mut buf = [0u8; READ_CHUNK];
                loop {
                    let n = self.source.read(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    out.extend_from_slice(&buf[..n]);
                }
                Ok(Bytes::from(out))
            }
            Some(size) => {
                let mut buf = vec![0u8; size];
                let n = self.source.read(&mut buf)?;
                buf.truncate(n);
                Ok(Bytes::from(buf))
            }
        }
    }

    /// Read one line.
    ///
    /// Bounded delegates to the source's line primitive with the cap.
    /// Unbounded appends fixed increments until an increment comes back
    /// short or a full increment ends in the line terminator.
    pub fn read_line(&mut self, size: Option<usize>) -> io::Result<Bytes> {
        match size {
            Some(size) => {
                let mut buf = vec![0u8; size];
                let n = self.source.read_line(&mut buf)?;
                buf.truncate(n);
                Ok(Bytes::from(buf))
            }
            None => {
                let mut out = Vec::new();
                let mut buf = [0u8; LINE_CHUNK];
                loop {
                    let n = self.source.read_line(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    out.extend_from_slice(&buf[..n]);
                    if n < LINE_CHUNK || buf[LINE_CHUNK - 1] == b'\n' {
                        break;
                    }
                }
                Ok(Bytes::from(out))
            }
        }
    }

    /// Read lines. The hint is advisory per the convention and ignored
    /// here; the result is a single-element sequence holding one
    /// [`read_line`](Self::read_line) result.
    pub fn read_lines(&mut self, _hint: Option<usize>) -> io::Result<Vec<Bytes>> {
        Ok(vec![self.read_line(None)?])
    }

    /// Iterate the remaining lines. Single-pass and finite; iteration
    /// ends at the first empty line result and cannot be restarted.
    pub fn lines(&mut self) -> Lines<'_> {
        Lines {
            input: self,
            done: false,
        }
    }
}

/// Lazy line iterator over a [`GatewayInput`].
pub struct Lines<'a> {
    input: &'a mut GatewayInput,
    done: bool,
}

impl Iterator for Lines<'_> {
    type Item = io::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.input.read_line(None) {
            Ok(line) if line.is_empty() => {
                self.done = true;
                None
            }
            Ok(line) => Some(Ok(line)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
