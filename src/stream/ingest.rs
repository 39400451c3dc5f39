//! Frame ingestion
//!
//! The ingestor is the only writer of a camera's slot. It runs on whatever
//! thread the transport dispatches on, encodes the raw frame and publishes
//! the result. A frame that fails to encode is dropped and the previous frame
//! stays visible to viewers.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, trace, warn};

use super::registry::{Camera, CameraRegistry};
use crate::error::AppError;
use crate::transport::{FrameCallback, FrameSource};
use crate::utils::LogThrottler;
use crate::video::{FrameEncoder, RawFrame};
use crate::warn_throttled;

/// Interval between repeated encode-failure warnings for one camera
const ENCODE_WARN_INTERVAL: Duration = Duration::from_secs(5);

/// Encodes raw frames for one camera and writes them into its slot
pub struct FrameIngestor {
    camera: Arc<Camera>,
    encoder: Arc<dyn FrameEncoder>,
    quality: u8,
    throttler: LogThrottler,
}

impl FrameIngestor {
    pub fn new(camera: Arc<Camera>, encoder: Arc<dyn FrameEncoder>, quality: u8) -> Self {
        Self {
            camera,
            encoder,
            quality,
            throttler: LogThrottler::new(ENCODE_WARN_INTERVAL),
        }
    }

    /// Handle one raw frame from the transport. Never fails.
    pub fn on_frame(&self, frame: RawFrame) {
        match self.encoder.encode(&frame, self.quality) {
            Ok(jpeg) => {
                let size = jpeg.len();
                if let Some(sequence) =
                    self.camera
                        .slot()
                        .write_frame(jpeg, frame.resolution, frame.capture_ts)
                {
                    trace!(
                        "Camera {} frame #{} {} -> {} bytes",
                        self.camera.id(),
                        sequence,
                        frame.resolution,
                        size
                    );
                    self.throttler.clear(self.camera.id());
                }
            }
            Err(e) => {
                self.camera.slot().record_encode_failure();
                warn_throttled!(
                    self.throttler,
                    self.camera.id(),
                    "Error processing {} frame ({} {}): {}",
                    self.camera.id(),
                    frame.format,
                    frame.resolution,
                    e
                );
            }
        }
    }

    /// Wrap the ingestor in a callback suitable for `FrameSource::subscribe`
    pub fn into_callback(self) -> FrameCallback {
        let ingestor = Arc::new(self);
        Arc::new(move |frame: RawFrame| ingestor.on_frame(frame))
    }
}

/// Subscribe every registered camera to its topic on `source`.
///
/// A failed subscription is not fatal; that camera keeps an empty slot.
/// Returns one `AppError::SubscriptionFailed` per camera left unattached.
pub fn attach_cameras(
    registry: &CameraRegistry,
    source: &dyn FrameSource,
    encoder: Arc<dyn FrameEncoder>,
    quality: u8,
) -> Vec<AppError> {
    let mut failures = Vec::new();
    for camera in registry.iter() {
        let topic = camera.source_topic();
        let callback = FrameIngestor::new(camera.clone(), encoder.clone(), quality).into_callback();
        if source.subscribe(topic, callback) {
            info!("  {} ({}): OK", topic, source.name());
        } else {
            warn!(
                "  {} ({}): FAILED, camera {} will have no frames",
                topic,
                source.name(),
                camera.id()
            );
            failures.push(AppError::SubscriptionFailed(topic.to_string()));
        }
    }
    failures
}
