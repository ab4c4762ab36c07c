//! Gateway application contract: the callable, its body-chunk sequence,
//! and the start-response callback.

use crate::gateway::Environ;
use bytes::Bytes;

/// A gateway application.
///
/// An application receives the per-request [`Environ`] and a
/// [`StartResponse`] handle, and returns a sequence of response-body
/// chunks. Status and headers are declared through `start_response`
/// before (or lazily with) the first body byte; the gateway drains the
/// returned sequence through the same handle.
pub trait GatewayApp: Send + Sync {
    /// Handle one request. The environ is owned by the application for
    /// the duration of the request; move it into the returned
    /// [`BodyChunks`] if the body needs to keep reading the input.
    fn call(
        &self,
        environ: Environ,
        start: &mut dyn StartResponse,
    ) -> Result<Box<dyn BodyChunks>, GantryError>;

    /// Get the application name.
    fn name(&self) -> &str;
}

impl std::fmt::Debug for dyn GatewayApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayApp")
            .field("name", &self.name())
            .finish()
    }
}

/// The response-starting callback handed to applications.
///
/// `start_response` declares the status line and headers; `write` pushes
/// body bytes. The gateway's emitter enforces the ordering rules: no
/// writes before a start, no header mutation after the first write.
pub trait StartResponse {
    /// Declare the status line (e.g. `"200 OK"`) and response headers.
    ///
    /// `exc_info` carries an in-flight application error: if headers were
    /// already transmitted the error is returned to the caller unchanged
    /// (it cannot be absorbed once bytes are on the wire); otherwise it is
    /// dropped and the new status/headers replace any pending pair.
    fn start_response(
        &mut self,
        status: &str,
        headers: Vec<(String, String)>,
        exc_info: Option<GantryError>,
    ) -> Result<(), GantryError>;

    /// Write one body chunk, committing the pending status/headers on the
    /// first call.
    fn write(&mut self, chunk: &[u8]) -> Result<(), GantryError>;
}

/// The sequence of body chunks an application returns.
///
/// `close` is the optional release hook; the gateway invokes it exactly
/// once on every exit path, including errors raised while draining.
pub trait BodyChunks: Send {
    /// Produce the next chunk, or `None` when the body is exhausted.
    fn next_chunk(&mut self) -> Result<Option<Bytes>, GantryError>;

    /// Release any resources held by the sequence. The default is a no-op.
    fn close(&mut self) {}
}

/// A fixed in-memory body.
impl BodyChunks for std::vec::IntoIter<Bytes> {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, GantryError> {
        Ok(self.next())
    }
}

/// Gateway error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unresolvable application identifier. Fatal at
    /// initialization, never per-request.
    Config,
    /// A non-conforming use of the convention: write before start, or
    /// start after headers were sent without an error value.
    Protocol,
    /// An application-reported failure.
    App,
    /// A failure on the host's underlying streams.
    Io,
}

impl ErrorKind {
    fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Protocol => "protocol",
            ErrorKind::App => "app",
            ErrorKind::Io => "io",
        }
    }
}

/// Gateway error type: a kind, a message, and an optional chained cause.
#[derive(Debug)]
pub struct GantryError {
    /// Error classification.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
    /// Underlying cause, if any.
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GantryError {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Create a protocol-usage error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    /// Create an application error.
    pub fn app(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::App, message)
    }

    /// Attach an underlying cause.
    pub fn with_cause(
        mut self,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl std::fmt::Display for GantryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for GantryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for GantryError {
    fn from(err: std::io::Error) -> Self {
        GantryError::new(ErrorKind::Io, err.to_string()).with_cause(err)
    }
}
