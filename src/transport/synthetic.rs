//! Synthetic frame source
//!
//! Publishes scrolling colour bars on every subscribed topic, one blocking
//! dispatch thread per topic, at the configured size and rate. Stands in for a
//! simulator transport when none is attached.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{is_valid_topic, FrameCallback, FrameSource};
use crate::config::SourceConfig;
use crate::video::{PixelFormat, RawFrame};

/// Colour bars, left to right
const BARS: [[u8; 3]; 8] = [
    [235, 235, 235],
    [235, 235, 16],
    [16, 235, 235],
    [16, 235, 16],
    [235, 16, 235],
    [235, 16, 16],
    [16, 16, 235],
    [16, 16, 16],
];

/// Horizontal scroll per frame, in pixels
const SCROLL_STEP: u64 = 4;

/// Render one RGB24 colour-bar frame, scrolled by `index` steps
pub fn test_pattern(width: u32, height: u32, index: u64) -> Vec<u8> {
    let width = width as usize;
    let offset = (index * SCROLL_STEP) as usize;

    let row: Vec<u8> = (0..width)
        .flat_map(|x| {
            let bar = ((x + offset) % width.max(1)) * BARS.len() / width.max(1);
            BARS[bar]
        })
        .collect();

    row.repeat(height as usize)
}

/// Test-pattern publisher
pub struct SyntheticSource {
    config: SourceConfig,
    stop_flag: Arc<AtomicBool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl SyntheticSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            stop_flag: Arc::new(AtomicBool::new(false)),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Number of topics being published
    pub fn topic_count(&self) -> usize {
        self.handles.lock().len()
    }

    /// Stop all publisher threads and wait for them to exit
    pub async fn shutdown(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        let handles: Vec<_> = self.handles.lock().drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Synthetic publisher task failed: {}", e);
            }
        }
        debug!("Synthetic source stopped");
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn subscribe(&self, topic: &str, callback: FrameCallback) -> bool {
        if !is_valid_topic(topic) {
            warn!("Invalid topic name: {:?}", topic);
            return false;
        }
        if self.stop_flag.load(Ordering::SeqCst) {
            warn!("Synthetic source already stopped, cannot subscribe {}", topic);
            return false;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime available to publish {}", topic);
            return false;
        };

        let config = self.config.clone();
        let stop_flag = self.stop_flag.clone();
        let topic_name = topic.to_string();
        let handle = runtime.spawn_blocking(move || {
            publish_loop(&topic_name, config, callback, stop_flag);
        });
        self.handles.lock().push(handle);

        info!(
            "Publishing synthetic {}x{} @ {}fps on {}",
            self.config.width, self.config.height, self.config.fps, topic
        );
        true
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }
}

fn publish_loop(
    topic: &str,
    config: SourceConfig,
    callback: FrameCallback,
    stop_flag: Arc<AtomicBool>,
) {
    let frame_interval = Duration::from_secs_f64(1.0 / f64::from(config.fps.max(1)));
    let mut next_deadline = Instant::now();
    let mut index: u64 = 0;

    while !stop_flag.load(Ordering::Relaxed) {
        let data = test_pattern(config.width, config.height, index);
        callback(RawFrame::from_vec(
            data,
            config.width,
            config.height,
            PixelFormat::Rgb24,
        ));
        index += 1;

        next_deadline += frame_interval;
        let now = Instant::now();
        if next_deadline > now {
            std::thread::sleep(next_deadline - now);
        } else {
            // Fell behind; publish the next frame right away from a fresh baseline
            next_deadline = now;
        }
    }

    debug!("Publisher for {} exited after {} frames", topic, index);
}
