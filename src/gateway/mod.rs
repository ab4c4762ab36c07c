//! The gateway core: environ construction, response emission, and the
//! input/error stream adapters.

mod emitter;
mod environ;
mod errlog;
mod handler;
mod input;
mod latin1;

pub use emitter::ResponseEmitter;
pub use environ::{Environ, EnvironBuilder, URL_SCHEME};
pub use errlog::ErrorLog;
pub use handler::Gateway;
pub use input::{GatewayInput, Lines};
pub use latin1::{latin1_decode, latin1_encode};
