//! Per-camera bookkeeping of connected stream clients

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Client ID type (UUID string)
pub type ClientId = String;

/// Rolling window FPS calculator
#[derive(Debug, Clone)]
pub struct FpsCalculator {
    /// Frame timestamps in last window
    frame_times: VecDeque<Instant>,
    /// Window duration
    window: Duration,
}

impl FpsCalculator {
    /// Create a new FPS calculator with 1-second window
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(64),
            window: Duration::from_secs(1),
        }
    }

    /// Record a frame sent at `now`
    pub fn record_frame_at(&mut self, now: Instant) {
        self.frame_times.push_back(now);

        while let Some(&oldest) = self.frame_times.front() {
            if now.duration_since(oldest) > self.window {
                self.frame_times.pop_front();
            } else {
                break;
            }
        }
    }

    /// Frames in the last window
    pub fn current_fps(&self) -> u32 {
        self.frame_times.len() as u32
    }
}

impl Default for FpsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-client session information
#[derive(Debug, Clone)]
struct ClientSession {
    connected_at: Instant,
    last_activity: Instant,
    frames_sent: u64,
    fps_calculator: FpsCalculator,
}

impl ClientSession {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            connected_at: now,
            last_activity: now,
            frames_sent: 0,
            fps_calculator: FpsCalculator::new(),
        }
    }
}

/// Client statistics exposed on the status API
#[derive(Debug, Clone, Serialize)]
pub struct ClientStats {
    pub id: String,
    pub fps: u32,
    pub frames_sent: u64,
    pub connected_secs: u64,
}

/// Registry of the stream clients watching one camera
pub struct ClientTracker {
    camera_id: String,
    clients: RwLock<HashMap<ClientId, ClientSession>>,
}

impl ClientTracker {
    pub fn new(camera_id: impl Into<String>) -> Self {
        Self {
            camera_id: camera_id.into(),
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Get current client count
    pub fn count(&self) -> usize {
        self.clients.read().len()
    }

    /// Check whether a client is registered
    pub fn contains(&self, client_id: &str) -> bool {
        self.clients.read().contains_key(client_id)
    }

    fn register(&self, client_id: ClientId) {
        let total = {
            let mut clients = self.clients.write();
            clients.insert(client_id.clone(), ClientSession::new());
            clients.len()
        };
        info!(
            "Client {} connected to camera {} (total: {})",
            client_id, self.camera_id, total
        );
    }

    fn unregister(&self, client_id: &str) {
        let removed = self.clients.write().remove(client_id);
        if let Some(session) = removed {
            let duration_secs = session.connected_at.elapsed().as_secs_f32();
            let avg_fps = if duration_secs > 0.1 {
                session.frames_sent as f32 / duration_secs
            } else {
                0.0
            };
            info!(
                "Client {} disconnected from camera {} after {:.1}s ({} frames, {:.1} avg FPS)",
                client_id, self.camera_id, duration_secs, session.frames_sent, avg_fps
            );
        }
    }

    /// Record frame sent to a specific client
    pub fn record_frame_sent(&self, client_id: &str) {
        if let Some(session) = self.clients.write().get_mut(client_id) {
            session.last_activity = Instant::now();
            session.frames_sent += 1;
            session.fps_calculator.record_frame_at(session.last_activity);
        }
    }

    /// Get per-client statistics
    pub fn stats(&self) -> Vec<ClientStats> {
        let mut stats: Vec<_> = self
            .clients
            .read()
            .iter()
            .map(|(id, session)| ClientStats {
                id: id.clone(),
                fps: session.fps_calculator.current_fps(),
                frames_sent: session.frames_sent,
                connected_secs: session.connected_at.elapsed().as_secs(),
            })
            .collect();
        stats.sort_by(|a, b| a.id.cmp(&b.id));
        stats
    }
}

/// RAII guard for client lifecycle management
///
/// Registers on creation and unregisters on drop, so a session that ends for
/// any reason (client gone, write error, panic) leaves no entry behind.
pub struct ClientGuard {
    client_id: ClientId,
    tracker: Arc<ClientTracker>,
}

impl ClientGuard {
    /// Register `client_id` with `tracker`
    pub fn new(client_id: ClientId, tracker: Arc<ClientTracker>) -> Self {
        tracker.register(client_id.clone());
        Self { client_id, tracker }
    }

    /// Register a client under a fresh random id
    pub fn random(tracker: Arc<ClientTracker>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), tracker)
    }

    /// Get client ID
    pub fn id(&self) -> &ClientId {
        &self.client_id
    }

    /// Record a frame handed to this client
    pub fn record_frame_sent(&self) {
        self.tracker.record_frame_sent(&self.client_id);
    }
}

impl Drop for ClientGuard {
    fn drop(&mut self) {
        self.tracker.unregister(&self.client_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_calculator_window() {
        let mut calc = FpsCalculator::new();
        assert_eq!(calc.current_fps(), 0);

        let start = Instant::now();
        calc.record_frame_at(start);
        calc.record_frame_at(start + Duration::from_millis(100));
        calc.record_frame_at(start + Duration::from_millis(200));
        assert_eq!(calc.current_fps(), 3);

        // Drops the frame at 0ms, keeps 100ms and 200ms
        calc.record_frame_at(start + Duration::from_millis(1050));
        assert_eq!(calc.current_fps(), 3);

        calc.record_frame_at(start + Duration::from_millis(1250));
        assert_eq!(calc.current_fps(), 2);
    }

    #[test]
    fn test_guard_registers_and_unregisters() {
        let tracker = Arc::new(ClientTracker::new("inspection"));
        let guard = ClientGuard::new("client-a".to_string(), tracker.clone());
        assert_eq!(tracker.count(), 1);
        assert!(tracker.contains("client-a"));

        guard.record_frame_sent();
        guard.record_frame_sent();
        let stats = tracker.stats();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].frames_sent, 2);

        drop(guard);
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn test_random_ids_are_distinct() {
        let tracker = Arc::new(ClientTracker::new("inspection"));
        let a = ClientGuard::random(tracker.clone());
        let b = ClientGuard::random(tracker.clone());
        assert_ne!(a.id(), b.id());
        assert_eq!(tracker.count(), 2);
    }
}
