//! Video frame data structures

use bytes::Bytes;
use std::time::Instant;

use super::format::{PixelFormat, Resolution};

/// A raw, uncompressed frame as published by a transport
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Tightly packed pixel data
    pub data: Bytes,
    /// Frame resolution
    pub resolution: Resolution,
    /// Pixel layout of `data`
    pub format: PixelFormat,
    /// Timestamp when frame was captured
    pub capture_ts: Instant,
}

impl RawFrame {
    /// Create a new raw frame
    pub fn new(data: Bytes, resolution: Resolution, format: PixelFormat) -> Self {
        Self {
            data,
            resolution,
            format,
            capture_ts: Instant::now(),
        }
    }

    /// Create a frame from a Vec<u8>
    pub fn from_vec(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self::new(Bytes::from(data), Resolution::new(width, height), format)
    }

    /// Number of bytes a well-formed frame of this geometry carries
    pub fn expected_len(&self) -> usize {
        self.format.frame_size(self.resolution)
    }
}

/// A compressed JPEG frame, immutable once built
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    /// JPEG-encoded image data
    data: Bytes,
    /// Frame resolution
    pub resolution: Resolution,
    /// Frame sequence number within its slot
    pub sequence: u64,
    /// Timestamp of the raw frame this was encoded from
    pub capture_ts: Instant,
}

impl EncodedFrame {
    pub fn new(data: Bytes, resolution: Resolution, sequence: u64, capture_ts: Instant) -> Self {
        Self {
            data,
            resolution,
            sequence,
            capture_ts,
        }
    }

    /// Get frame data as bytes slice
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get frame data as Bytes (cheap clone)
    pub fn data_bytes(&self) -> Bytes {
        self.data.clone()
    }

    /// Get data length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if frame is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get width
    pub fn width(&self) -> u32 {
        self.resolution.width
    }

    /// Get height
    pub fn height(&self) -> u32 {
        self.resolution.height
    }
}
