//! Owned host request with a builder API.

use crate::host::{BytesInput, HostInput, HostRequest};
use bytes::Bytes;

/// A [`HostRequest`] built from already-parsed request metadata.
///
/// Header order is preserved; repeated names accumulate multiple values
/// under one entry, in insertion order.
pub struct SimpleRequest {
    method: String,
    script_name: String,
    path_info: Option<String>,
    query_string: Option<String>,
    content_type: Option<String>,
    content_length: Option<u64>,
    remote_addr: String,
    remote_host: String,
    remote_port: u16,
    server_name: String,
    server_port: u16,
    protocol: String,
    scheme: String,
    headers: Vec<(String, Vec<Bytes>)>,
    input: Option<Box<dyn HostInput + Send>>,
}

impl SimpleRequest {
    /// Create a request with the given method and host defaults
    /// (localhost peer, `HTTP/1.1`, `http` scheme, empty body).
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            script_name: String::new(),
            path_info: None,
            query_string: None,
            content_type: None,
            content_length: None,
            remote_addr: "127.0.0.1".to_string(),
            remote_host: "127.0.0.1".to_string(),
            remote_port: 0,
            server_name: "localhost".to_string(),
            server_port: 80,
            protocol: "HTTP/1.1".to_string(),
            scheme: "http".to_string(),
            headers: Vec::new(),
            input: None,
        }
    }

    /// Set the mount-point path prefix.
    pub fn script_name(mut self, script_name: impl Into<String>) -> Self {
        self.script_name = script_name.into();
        self
    }

    /// Set the path after the mount point.
    pub fn path_info(mut self, path_info: impl Into<String>) -> Self {
        self.path_info = Some(path_info.into());
        self
    }

    /// Set the query string.
    pub fn query_string(mut self, query_string: impl Into<String>) -> Self {
        self.query_string = Some(query_string.into());
        self
    }

    /// Set the body content type.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the known body length.
    pub fn content_length(mut self, content_length: u64) -> Self {
        self.content_length = Some(content_length);
        self
    }

    /// Set the client address, host name and port.
    pub fn remote(mut self, addr: impl Into<String>, port: u16) -> Self {
        let addr = addr.into();
        self.remote_host = addr.clone();
        self.remote_addr = addr;
        self.remote_port = port;
        self
    }

    /// Set the server name and port.
    pub fn server(mut self, name: impl Into<String>, port: u16) -> Self {
        self.server_name = name.into();
        self.server_port = port;
        self
    }

    /// Set the protocol version string.
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Set the URL scheme.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Add one header value. Repeating a name appends to its value list.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<Bytes>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.headers.push((name, vec![value])),
        }
        self
    }

    /// Attach the request body stream.
    pub fn input(mut self, input: impl HostInput + Send + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Attach a fully-buffered request body.
    pub fn body(self, body: impl Into<Bytes>) -> Self {
        self.input(BytesInput::new(body))
    }
}

impl HostRequest for SimpleRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn script_name(&self) -> &str {
        &self.script_name
    }

    fn path_info(&self) -> Option<&str> {
        self.path_info.as_deref()
    }

    fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    fn remote_host(&self) -> &str {
        &self.remote_host
    }

    fn remote_port(&self) -> u16 {
        self.remote_port
    }

    fn server_name(&self) -> &str {
        &self.server_name
    }

    fn server_port(&self) -> u16 {
        self.server_port
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn header_names(&self) -> Vec<String> {
        self.headers.iter().map(|(n, _)| n.clone()).collect()
    }

    fn header_values(&self, name: &str) -> Vec<Bytes> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.clone())
            .unwrap_or_default()
    }

    fn take_input(&mut self) -> Box<dyn HostInput + Send> {
        self.input
            .take()
            .unwrap_or_else(|| Box::new(BytesInput::empty()))
    }
}
