//! Encoder traits and common types

use bytes::Bytes;

use crate::error::Result;
use crate::video::frame::RawFrame;

/// Default JPEG quality used when none is configured
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Converts raw frames into a compressed, independently decodable image.
///
/// Implementations are shared between transport dispatch threads, so they
/// must be `Sync` and hold no per-call mutable state.
pub trait FrameEncoder: Send + Sync {
    /// Get encoder name
    fn name(&self) -> &str;

    /// Encode a raw frame at the given quality (1-100)
    ///
    /// Fails with [`AppError::Encoding`](crate::error::AppError::Encoding) on
    /// malformed input.
    fn encode(&self, frame: &RawFrame, quality: u8) -> Result<Bytes>;
}
