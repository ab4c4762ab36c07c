//! Application convention: the callable contract and its resolution.

pub mod handler;
pub mod registry;

pub use handler::{BodyChunks, ErrorKind, GantryError, GatewayApp, StartResponse};
pub use registry::AppRegistry;
