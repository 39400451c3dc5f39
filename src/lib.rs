//! cam-relay - MJPEG-over-HTTP relay for simulated cameras
//!
//! Raw frames pushed by a transport are encoded to JPEG and kept as the
//! latest frame per camera; any number of HTTP clients stream them as
//! `multipart/x-mixed-replace` at a capped rate.

pub mod config;
pub mod error;
pub mod state;
pub mod stream;
pub mod transport;
pub mod utils;
pub mod video;
pub mod web;

pub use error::{AppError, Result};
