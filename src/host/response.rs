//! Buffering host response.

use crate::host::HostResponse;
use std::io;

/// A [`HostResponse`] that buffers status, headers and body in memory.
///
/// Hosts that assemble the full response before transmission (the bundled
/// hyper runtime does) drain the buffers afterwards. `flush` counts are
/// recorded for hosts that care about pacing.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    /// Committed status code, once set.
    pub status: Option<u16>,
    /// Headers in the order they were added; values are raw bytes.
    pub headers: Vec<(String, Vec<u8>)>,
    /// Accumulated body bytes.
    pub body: Vec<u8>,
    /// Number of flush calls observed.
    pub flushes: usize,
}

impl BufferedResponse {
    /// Create an empty response buffer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HostResponse for BufferedResponse {
    fn set_status(&mut self, code: u16) {
        self.status = Some(code);
    }

    fn add_header(&mut self, name: &str, value: &[u8]) {
        self.headers.push((name.to_string(), value.to_vec()));
    }

    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(chunk);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
