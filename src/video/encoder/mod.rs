//! Frame encoder implementations
//!
//! - `FrameEncoder` trait: raw frame to compressed image bytes
//! - `JpegEncoder`: JPEG encoding for RGB/BGR/RGBA/grayscale frames

pub mod jpeg;
pub mod traits;

pub use jpeg::JpegEncoder;
pub use traits::{FrameEncoder, DEFAULT_JPEG_QUALITY};
