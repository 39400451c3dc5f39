//! Video frame module
//!
//! Raw and encoded frame types plus the encoder adapter used by ingestion.

pub mod encoder;
pub mod format;
pub mod frame;

pub use encoder::{FrameEncoder, JpegEncoder};
pub use format::{PixelFormat, Resolution};
pub use frame::{EncodedFrame, RawFrame};
