//! In-memory host input source.

use crate::host::HostInput;
use bytes::Bytes;
use std::io;

/// A [`HostInput`] over a fully-buffered body.
///
/// Hosts that collect the request body before dispatch (the bundled hyper
/// runtime does) wrap it in this cursor.
#[derive(Debug, Clone)]
pub struct BytesInput {
    data: Bytes,
    pos: usize,
}

impl BytesInput {
    /// Create an input source over the given bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    /// An already-exhausted source.
    pub fn empty() -> Self {
        Self::new(Bytes::new())
    }

    fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }
}

impl HostInput for BytesInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        let n = buf.len().min(remaining.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }

    fn read_line(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        let cap = buf.len().min(remaining.len());
        let n = match remaining[..cap].iter().position(|&b| b == b'\n') {
            Some(i) => i + 1,
            None => cap,
        };
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}
