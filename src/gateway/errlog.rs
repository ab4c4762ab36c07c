//! Error-stream adapter over the host's logging facility.

use crate::host::HostLog;
use std::io::Write;
use std::sync::Arc;

/// The error-stream handle exposed to applications via the environ.
///
/// Routes messages through the host's logging facility once the gateway
/// is configured; before that, messages fall back to the process
/// standard-error stream.
#[derive(Clone)]
pub struct ErrorLog {
    sink: Option<Arc<dyn HostLog>>,
}

impl ErrorLog {
    /// An error log routed through the host's logging facility.
    pub fn new(sink: Arc<dyn HostLog>) -> Self {
        Self { sink: Some(sink) }
    }

    /// An error log for a gateway that has not been configured yet.
    pub fn unconfigured() -> Self {
        Self { sink: None }
    }

    /// Write one message.
    pub fn write(&self, message: &str) {
        match &self.sink {
            Some(sink) => sink.log(message),
            None => {
                let _ = write!(
                    std::io::stderr(),
                    "gateway not configured: {}",
                    message
                );
            }
        }
    }

    /// Write each message in order.
    pub fn write_lines<I, S>(&self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for message in messages {
            self.write(message.as_ref());
        }
    }

    /// No-op; the host facility is unbuffered from this side.
    pub fn flush(&self) {}
}
