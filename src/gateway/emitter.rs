//! Response emission state machine.

use crate::app::{GantryError, StartResponse};
use crate::gateway::latin1::latin1_encode;
use crate::host::HostResponse;

/// Header state for one request.
enum EmitterState {
    /// No status or headers declared yet.
    Init,
    /// A status/header pair is pending; nothing transmitted.
    HeadersSet {
        status: String,
        headers: Vec<(String, String)>,
    },
    /// Status and headers have been committed to the host. Terminal for
    /// header mutation; body writes continue.
    HeadersSent,
}

/// Per-request response emitter.
///
/// Defers the status/header flush until the first body write, detects
/// write-before-start and start-after-send misuse, and re-raises an
/// in-flight application error when headers are already on the wire.
pub struct ResponseEmitter<'a, R: HostResponse> {
    response: &'a mut R,
    state: EmitterState,
}

impl<'a, R: HostResponse> ResponseEmitter<'a, R> {
    /// Create an emitter over the host's response object.
    pub fn new(response: &'a mut R) -> Self {
        Self {
            response,
            state: EmitterState::Init,
        }
    }

    /// Whether status and headers have been transmitted to the host.
    pub fn headers_sent(&self) -> bool {
        matches!(self.state, EmitterState::HeadersSent)
    }

    /// Commit a status/header pair to the host response. Everything
    /// fallible (status parse, header encoding) happens before the host
    /// response is touched, so a failed commit leaves it untouched.
    fn send_headers(&mut self, status: &str, headers: &[(String, String)]) -> Result<(), GantryError> {
        let code = parse_status(status)?;
        let mut encoded = Vec::with_capacity(headers.len());
        for (name, value) in headers {
            encoded.push((name, latin1_encode(value)?));
        }

        self.response.set_status(code);
        for (name, value) in encoded {
            self.response.add_header(name, &value);
        }
        Ok(())
    }
}

impl<R: HostResponse> StartResponse for ResponseEmitter<'_, R> {
    fn start_response(
        &mut self,
        status: &str,
        headers: Vec<(String, String)>,
        exc_info: Option<GantryError>,
    ) -> Result<(), GantryError> {
        match exc_info {
            Some(err) => {
                if self.headers_sent() {
                    // Cannot un-send committed headers; hand the original
                    // error back. The value is moved out, retaining no
                    // reference to it here.
                    return Err(err);
                }
                // Not sent yet: the error is dropped and the new pair
                // replaces the old.
            }
            None => {
                if !matches!(self.state, EmitterState::Init) {
                    return Err(GantryError::protocol("headers already set"));
                }
            }
        }

        self.state = EmitterState::HeadersSet {
            status: status.to_string(),
            headers,
        };
        Ok(())
    }

    fn write(&mut self, chunk: &[u8]) -> Result<(), GantryError> {
        match std::mem::replace(&mut self.state, EmitterState::HeadersSent) {
            EmitterState::Init => {
                self.state = EmitterState::Init;
                return Err(GantryError::protocol(
                    "write() before start_response()",
                ));
            }
            EmitterState::HeadersSet { status, headers } => {
                // A failed commit transmitted nothing; the pair stays
                // pending so an error path can still replace it.
                if let Err(e) = self.send_headers(&status, &headers) {
                    self.state = EmitterState::HeadersSet { status, headers };
                    return Err(e);
                }
            }
            EmitterState::HeadersSent => {}
        }

        self.response.write_body(chunk)?;
        self.response.flush()?;
        Ok(())
    }
}

/// Parse the numeric code from the leading token of a status line such
/// as `"200 OK"`.
fn parse_status(status: &str) -> Result<u16, GantryError> {
    status
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u16>().ok())
        .ok_or_else(|| {
            GantryError::protocol(format!("malformed status line: {:?}", status))
        })
}
