//! The gantry runtime: the bundled hyper host server and its configuration.

mod config;
mod server;

pub use config::GantryConfig;
pub use server::{BoundGantry, GantryServer};
