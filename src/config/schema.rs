use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::stream::DEFAULT_MAX_FPS;
use crate::video::encoder::DEFAULT_JPEG_QUALITY;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Web server settings
    pub web: WebConfig,
    /// Streaming settings
    pub stream: StreamConfig,
    /// Synthetic frame source settings
    pub source: SourceConfig,
    /// Cameras, in display order
    pub cameras: Vec<CameraConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            stream: StreamConfig::default(),
            source: SourceConfig::default(),
            cameras: vec![CameraConfig::default()],
        }
    }
}

impl AppConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.cameras.is_empty() {
            return Err(AppError::Config("at least one camera is required".into()));
        }

        let mut seen = std::collections::HashSet::new();
        for camera in &self.cameras {
            if camera.id.is_empty() {
                return Err(AppError::Config("camera id must not be empty".into()));
            }
            if camera.id.contains('/') {
                return Err(AppError::Config(format!(
                    "camera id {:?} must not contain '/'",
                    camera.id
                )));
            }
            if !seen.insert(camera.id.as_str()) {
                return Err(AppError::Config(format!("duplicate camera id {:?}", camera.id)));
            }
        }

        if let Some(default) = &self.web.default_camera {
            if !seen.contains(default.as_str()) {
                return Err(AppError::Config(format!(
                    "default camera {:?} is not configured",
                    default
                )));
            }
        }

        if self.stream.max_fps == 0 {
            return Err(AppError::Config("stream.max_fps must be > 0".into()));
        }
        if !(1..=100).contains(&self.stream.jpeg_quality) {
            return Err(AppError::Config(format!(
                "stream.jpeg_quality must be 1-100, got {}",
                self.stream.jpeg_quality
            )));
        }
        if self.source.fps == 0 || self.source.width == 0 || self.source.height == 0 {
            return Err(AppError::Config(
                "source fps, width and height must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Get HTTP address
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.web.bind_address, self.web.http_port)
    }
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address
    pub bind_address: String,
    /// HTTP port
    pub http_port: u16,
    /// Camera served by `/stream` and `/snapshot` (defaults to the only camera)
    pub default_camera: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            http_port: 8080,
            default_camera: None,
        }
    }
}

/// Streaming configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    /// Per-client emission cap
    pub max_fps: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_fps: DEFAULT_MAX_FPS,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Synthetic source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Publish rate per topic
    pub fps: u32,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            width: 640,
            height: 480,
        }
    }
}

/// One camera entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraConfig {
    /// Unique id, used in URLs
    pub id: String,
    /// Transport topic the camera subscribes to
    pub topic: String,
    /// Display name
    pub label: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            id: "inspection".to_string(),
            topic: "/inspection_camera".to_string(),
            label: "Inspection Camera (RGB)".to_string(),
        }
    }
}
