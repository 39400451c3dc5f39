//! Application configuration
//!
//! Static configuration read once at startup from an optional TOML file.
//! Command line flags may override individual values afterwards.

mod schema;
pub mod store;

pub use schema::{AppConfig, CameraConfig, SourceConfig, StreamConfig, WebConfig};
pub use store::{load, parse};
