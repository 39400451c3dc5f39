//! JPEG encoder implementation
//!
//! Encodes RGB24, BGR24, RGBA32 and GRAY8 frames with the pure-Rust
//! `image` JPEG codec. BGR and RGBA input is repacked to RGB first since
//! baseline JPEG has no alpha channel and no BGR ordering.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use image::ExtendedColorType;

use super::traits::FrameEncoder;
use crate::error::{AppError, Result};
use crate::video::format::PixelFormat;
use crate::video::frame::RawFrame;

/// Stateless JPEG encoder
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegEncoder;

impl JpegEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl FrameEncoder for JpegEncoder {
    fn name(&self) -> &str {
        "jpeg"
    }

    fn encode(&self, frame: &RawFrame, quality: u8) -> Result<Bytes> {
        let resolution = frame.resolution;
        if resolution.is_empty() {
            return Err(AppError::Encoding(format!(
                "invalid frame dimensions {}",
                resolution
            )));
        }

        let expected_size = frame.expected_len();
        if frame.data.len() < expected_size {
            return Err(AppError::Encoding(format!(
                "{} data too small for {}: {} < {}",
                frame.format,
                resolution,
                frame.data.len(),
                expected_size
            )));
        }
        let pixels = &frame.data[..expected_size];

        let mut jpeg = Vec::with_capacity(expected_size / 4);
        let mut encoder = ImageJpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100));

        let result = match frame.format {
            PixelFormat::Rgb24 => encoder.encode(
                pixels,
                resolution.width,
                resolution.height,
                ExtendedColorType::Rgb8,
            ),
            PixelFormat::Gray8 => encoder.encode(
                pixels,
                resolution.width,
                resolution.height,
                ExtendedColorType::L8,
            ),
            PixelFormat::Bgr24 => {
                let rgb: Vec<u8> = pixels
                    .chunks_exact(3)
                    .flat_map(|p| [p[2], p[1], p[0]])
                    .collect();
                encoder.encode(
                    &rgb,
                    resolution.width,
                    resolution.height,
                    ExtendedColorType::Rgb8,
                )
            }
            PixelFormat::Rgba32 => {
                let rgb: Vec<u8> = pixels
                    .chunks_exact(4)
                    .flat_map(|p| [p[0], p[1], p[2]])
                    .collect();
                encoder.encode(
                    &rgb,
                    resolution.width,
                    resolution.height,
                    ExtendedColorType::Rgb8,
                )
            }
        };

        result.map_err(|e| AppError::Encoding(format!("JPEG compression failed: {}", e)))?;
        Ok(Bytes::from(jpeg))
    }
}
