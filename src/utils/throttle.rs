//! Log throttling
//!
//! Limits how often the same message is logged, so a feed that keeps
//! producing malformed frames at 30 Hz does not flood the log.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Log throttler keyed by message identity
///
/// # Example
///
/// ```rust
/// use cam_relay::utils::LogThrottler;
/// use std::time::Duration;
///
/// let throttler = LogThrottler::new(Duration::from_secs(5));
/// assert!(throttler.should_log("inspection"));
/// assert!(!throttler.should_log("inspection"));
/// ```
pub struct LogThrottler {
    /// Map of message key to last log time
    last_logged: RwLock<HashMap<String, Instant>>,
    /// Throttle interval
    interval: Duration,
}

impl LogThrottler {
    /// Create a new log throttler with the specified interval
    pub fn new(interval: Duration) -> Self {
        Self {
            last_logged: RwLock::new(HashMap::new()),
            interval,
        }
    }

    /// Create a new log throttler with interval specified in seconds
    pub fn with_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Returns `true` (and restarts the interval) if `key` may be logged now
    pub fn should_log(&self, key: &str) -> bool {
        self.should_log_at(key, Instant::now())
    }

    fn should_log_at(&self, key: &str, now: Instant) -> bool {
        {
            let map = self.last_logged.read();
            if let Some(last) = map.get(key) {
                if now.saturating_duration_since(*last) < self.interval {
                    return false;
                }
            }
        }

        let mut map = self.last_logged.write();
        // Another thread may have logged between the two locks
        if let Some(last) = map.get(key) {
            if now.saturating_duration_since(*last) < self.interval {
                return false;
            }
        }
        map.insert(key.to_string(), now);
        true
    }

    /// Forget `key`, so its next error is logged immediately.
    ///
    /// Cheap when the key is not tracked, which is the common case on the
    /// per-frame success path.
    pub fn clear(&self, key: &str) {
        if self.last_logged.read().contains_key(key) {
            self.last_logged.write().remove(key);
        }
    }

    /// Get the number of tracked keys
    pub fn len(&self) -> usize {
        self.last_logged.read().len()
    }

    /// Check if the throttler is empty
    pub fn is_empty(&self) -> bool {
        self.last_logged.read().is_empty()
    }
}

impl Default for LogThrottler {
    /// Create a default log throttler with 5 second interval
    fn default() -> Self {
        Self::with_secs(5)
    }
}

/// Throttled warning: logs through `tracing::warn!` at most once per interval
/// for a given key
#[macro_export]
macro_rules! warn_throttled {
    ($throttler:expr, $key:expr, $($arg:tt)*) => {
        if $throttler.should_log($key) {
            tracing::warn!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttles_within_interval() {
        let throttler = LogThrottler::with_secs(5);
        let start = Instant::now();

        assert!(throttler.should_log_at("cam", start));
        assert!(!throttler.should_log_at("cam", start + Duration::from_secs(1)));
        assert!(throttler.should_log_at("other", start + Duration::from_secs(1)));
        assert!(throttler.should_log_at("cam", start + Duration::from_secs(6)));
        assert_eq!(throttler.len(), 2);
    }

    #[test]
    fn test_clear_resets_key() {
        let throttler = LogThrottler::default();
        assert!(throttler.should_log("cam"));
        assert!(!throttler.should_log("cam"));

        throttler.clear("cam");
        assert!(throttler.is_empty());
        assert!(throttler.should_log("cam"));

        // Clearing an unknown key is a no-op
        throttler.clear("missing");
        assert_eq!(throttler.len(), 1);
    }
}
