//! Frame transport abstraction
//!
//! A transport delivers raw frames for named topics by invoking a callback on
//! its own dispatch thread, repeatedly, for the life of the process.

pub mod synthetic;

use std::sync::Arc;

use crate::video::RawFrame;

pub use synthetic::SyntheticSource;

/// Callback invoked by a transport for every published frame
pub type FrameCallback = Arc<dyn Fn(RawFrame) + Send + Sync>;

/// Push-model frame source
pub trait FrameSource: Send + Sync {
    /// Get source name
    fn name(&self) -> &str;

    /// Attach `callback` to `topic`.
    ///
    /// Returns `false` if the subscription could not be established. The
    /// caller treats that as non-fatal.
    fn subscribe(&self, topic: &str, callback: FrameCallback) -> bool;
}

/// Check a topic name: absolute, non-empty segments, no whitespace
pub fn is_valid_topic(topic: &str) -> bool {
    topic.len() > 1
        && topic.starts_with('/')
        && !topic.contains("//")
        && !topic.ends_with('/')
        && !topic.chars().any(char::is_whitespace)
}
