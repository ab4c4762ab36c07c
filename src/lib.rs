//! # Gantry - WSGI-style gateway bridge
//!
//! Gantry bridges a host HTTP server's native request/response object
//! model to a portable application convention: an application is a single
//! callable that receives a per-request environ mapping and a
//! start-response handle, and returns a sequence of response-body chunks.
//!
//! ## Architecture
//!
//! ```text
//! host server ──> Gateway ──> (EnvironBuilder, GatewayInput, ErrorLog)
//!                    │
//!                    ▼
//!              application ──> ResponseEmitter ──> host output channel
//! ```
//!
//! The gateway enforces the convention's ordering rules: status and
//! headers are declared through `start_response` and committed by the
//! first body write; a request always commits a response even when the
//! body is empty; the body sequence's release hook runs on every exit
//! path.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use gantry::prelude::*;
//!
//! struct HelloApp;
//!
//! impl GatewayApp for HelloApp {
//!     fn call(
//!         &self,
//!         _environ: Environ,
//!         start: &mut dyn StartResponse,
//!     ) -> Result<Box<dyn BodyChunks>, GantryError> {
//!         start.start_response(
//!             "200 OK",
//!             vec![("Content-Type".to_string(), "text/plain".to_string())],
//!             None,
//!         )?;
//!         Ok(Box::new(vec![Bytes::from_static(b"Hello from gantry!")].into_iter()))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "hello"
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = GantryConfig::new().handler("demo.hello");
//!     let server = GantryServer::new(config);
//!     server.register_app("demo.hello", std::sync::Arc::new(HelloApp))?;
//!     server.run().await
//! }
//! ```
//!
//! ## Concurrency
//!
//! All request state (the environ, the emitter's header state, the input
//! adapter) is scoped to one [`Gateway::handle`](gateway::Gateway::handle)
//! call; the host may dispatch many such calls concurrently with no
//! coordination. Reads and writes block the calling thread until the
//! host's stream completes them.

pub mod app;
pub mod gateway;
pub mod host;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::app::{
        AppRegistry, BodyChunks, ErrorKind, GantryError, GatewayApp, StartResponse,
    };
    pub use crate::gateway::{Environ, EnvironBuilder, ErrorLog, Gateway, GatewayInput};
    pub use crate::host::{HostInput, HostLog, HostRequest, HostResponse};
    pub use crate::runtime::{GantryConfig, GantryServer};
}

// Re-export for convenience
pub use app::{AppRegistry, BodyChunks, ErrorKind, GantryError, GatewayApp, StartResponse};
pub use gateway::{Environ, EnvironBuilder, ErrorLog, Gateway, GatewayInput};
pub use runtime::{GantryConfig, GantryServer};
