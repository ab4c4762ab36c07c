//! Gantry server configuration.

use crate::app::GantryError;
use serde::{Deserialize, Serialize};

/// Configuration for the gantry server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GantryConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Fully-qualified identifier of the application to serve,
    /// e.g. `"demo.hello"`. Resolved once at startup.
    pub handler: String,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for GantryConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            handler: String::new(),
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl GantryConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the application identifier to serve.
    pub fn handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = handler.into();
        self
    }

    /// Set the maximum request body size.
    pub fn max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Parse a config from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, GantryError> {
        serde_json::from_str(json)
            .map_err(|e| GantryError::config(format!("invalid config: {}", e)))
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
