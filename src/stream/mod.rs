//! Frame relay core
//!
//! # Components
//!
//! - `FrameSlot` - latest encoded frame of one camera
//! - `CameraRegistry` - camera id to camera (slot + metadata)
//! - `FrameIngestor` - transport callback that encodes and publishes frames
//! - `StreamSession` - per-client paced MJPEG generator
//! - `ClientTracker` - per-camera connected client statistics

pub mod clients;
pub mod ingest;
pub mod mjpeg;
pub mod registry;
pub mod session;
pub mod slot;

pub use clients::{ClientGuard, ClientStats, ClientTracker};
pub use ingest::{attach_cameras, FrameIngestor};
pub use registry::{Camera, CameraRegistry, CameraStatus};
pub use session::{pacing_interval, SessionState, StreamSession, DEFAULT_MAX_FPS};
pub use slot::{FrameSlot, SlotStats};
