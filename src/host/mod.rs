//! Host-server boundary: the native request/response object model the
//! gateway bridges from.
//!
//! The host server owns the network connection; the gateway only consumes
//! these traits. [`SimpleRequest`], [`BufferedResponse`] and [`BytesInput`]
//! are ready-made implementations for hosts that hand over an
//! already-parsed request.

mod input;
mod request;
mod response;

pub use input::BytesInput;
pub use request::SimpleRequest;
pub use response::BufferedResponse;

use bytes::Bytes;
use std::io;

/// Host-side view of an inbound request's metadata.
pub trait HostRequest {
    /// HTTP method, e.g. `"GET"`.
    fn method(&self) -> &str;
    /// The path prefix the application is mounted at (may be empty).
    fn script_name(&self) -> &str;
    /// Remaining path after the mount point, if any.
    fn path_info(&self) -> Option<&str>;
    /// Raw query string, if any.
    fn query_string(&self) -> Option<&str>;
    /// Content-Type of the request body, if any.
    fn content_type(&self) -> Option<&str>;
    /// Body length if the host knows it; `None` when unknown.
    fn content_length(&self) -> Option<u64>;
    /// Client address.
    fn remote_addr(&self) -> &str;
    /// Client host name (hosts without reverse lookup report the address).
    fn remote_host(&self) -> &str;
    /// Client port.
    fn remote_port(&self) -> u16;
    /// Server host name.
    fn server_name(&self) -> &str;
    /// Server port.
    fn server_port(&self) -> u16;
    /// Protocol version, e.g. `"HTTP/1.1"`.
    fn protocol(&self) -> &str;
    /// URL scheme, e.g. `"http"`.
    fn scheme(&self) -> &str;
    /// Header names in the order the host reports them.
    fn header_names(&self) -> Vec<String>;
    /// Raw values for one header, in the order the host reports them.
    fn header_values(&self, name: &str) -> Vec<Bytes>;
    /// Take ownership of the request body stream. Subsequent calls yield
    /// an empty stream.
    fn take_input(&mut self) -> Box<dyn HostInput + Send>;
}

/// Host-side response object: status, headers, and the output channel.
pub trait HostResponse {
    /// Set the numeric response status.
    fn set_status(&mut self, code: u16);
    /// Add one response header (values are raw bytes).
    fn add_header(&mut self, name: &str, value: &[u8]);
    /// Append body bytes to the output channel.
    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()>;
    /// Flush the output channel.
    fn flush(&mut self) -> io::Result<()>;
}

/// A blocking, seek-less byte source for the request body.
pub trait HostInput {
    /// Read up to `buf.len()` bytes; returns the count, `0` at
    /// end-of-stream. May return fewer bytes than requested.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    /// Read up to `buf.len()` bytes, stopping after the first `\n`;
    /// returns the count including the terminator, `0` at end-of-stream.
    fn read_line(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// The host's logging facility, used for application error-stream output.
pub trait HostLog: Send + Sync {
    /// Record one message.
    fn log(&self, message: &str);
}
