use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::Result;
use crate::stream::{pacing_interval, CameraRegistry};

/// Application-wide state shared across handlers
///
/// Everything here is fixed after startup; the only mutable data are the
/// cameras' frame slots and client trackers, which synchronize themselves.
pub struct AppState {
    /// Startup configuration
    pub config: AppConfig,
    /// Registered cameras
    pub registry: Arc<CameraRegistry>,
    /// Per-client pacing interval
    stream_interval: Duration,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, registry: Arc<CameraRegistry>) -> Arc<Self> {
        let stream_interval = pacing_interval(config.stream.max_fps);
        Arc::new(Self {
            config,
            registry,
            stream_interval,
        })
    }

    /// Build the camera registry described by `config` and wrap it in state
    pub fn from_config(config: AppConfig) -> Result<Arc<Self>> {
        let mut registry = CameraRegistry::from_config(&config.cameras)?;
        if let Some(default) = &config.web.default_camera {
            registry.set_default_camera(default.clone())?;
        }
        Ok(Self::new(config, Arc::new(registry)))
    }

    /// Interval between frames sent to one stream client
    pub fn stream_interval(&self) -> Duration {
        self.stream_interval
    }
}
