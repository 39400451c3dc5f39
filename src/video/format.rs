//! Pixel format definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw pixel layouts a transport may publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PixelFormat {
    /// RGB24 format (3 bytes per pixel)
    Rgb24,
    /// BGR24 format (3 bytes per pixel)
    Bgr24,
    /// RGBA32 format (4 bytes per pixel, alpha is discarded on encode)
    Rgba32,
    /// 8-bit grayscale
    Gray8,
}

impl PixelFormat {
    /// Get bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => 3,
            PixelFormat::Rgba32 => 4,
            PixelFormat::Gray8 => 1,
        }
    }

    /// Calculate expected frame size for a given resolution
    pub fn frame_size(&self, resolution: Resolution) -> usize {
        resolution.pixels() as usize * self.bytes_per_pixel()
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Rgb24 => "RGB24",
            PixelFormat::Bgr24 => "BGR24",
            PixelFormat::Rgba32 => "RGBA32",
            PixelFormat::Gray8 => "GRAY8",
        };
        write!(f, "{}", name)
    }
}

/// Resolution (width x height)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A frame with either dimension at zero cannot be encoded
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get total pixels
    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub const VGA: Resolution = Resolution {
        width: 640,
        height: 480,
    };
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size() {
        assert_eq!(PixelFormat::Rgb24.frame_size(Resolution::VGA), 640 * 480 * 3);
        assert_eq!(PixelFormat::Rgba32.frame_size((2, 2).into()), 16);
        assert_eq!(PixelFormat::Gray8.frame_size((3, 1).into()), 3);
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::VGA.to_string(), "640x480");
        assert!(Resolution::new(0, 10).is_empty());
        assert!(!Resolution::new(1, 1).is_empty());
    }
}
