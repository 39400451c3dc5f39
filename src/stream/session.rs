//! Per-client MJPEG stream session
//!
//! A session owns a pacing ticker and a client guard. On every tick it reads
//! the camera's slot and, if a frame is present, produces one multipart part.
//! The HTTP body stream pulls parts only when the connection accepts more data,
//! so a slow client never builds a backlog; it just sees fewer, fresher frames.
//! Dropping the session (the body is dropped when the client goes away or a
//! write fails) stops the ticker and unregisters the client.

use bytes::Bytes;
use futures::Stream;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::debug;

use super::clients::ClientGuard;
use super::mjpeg::create_mjpeg_part;
use super::registry::Camera;

/// Default emission cap per client
pub const DEFAULT_MAX_FPS: u32 = 30;

/// Pacing interval for a given frame rate cap
///
/// Never zero, so any `max_fps` yields a valid ticker period.
pub fn pacing_interval(max_fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(max_fps.max(1))).max(Duration::from_nanos(1))
}

/// Stream session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No frame has been published yet; ticking without emitting
    AwaitFirstFrame,
    /// Emitting the latest frame on each tick
    Streaming,
    /// Connection gone; no further slot reads
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AwaitFirstFrame => write!(f, "await_first_frame"),
            SessionState::Streaming => write!(f, "streaming"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}

/// One HTTP client's view of one camera
pub struct StreamSession {
    camera: Arc<Camera>,
    ticker: Option<Interval>,
    guard: Option<ClientGuard>,
    state: SessionState,
    last_emitted_sequence: Option<u64>,
    frames_emitted: u64,
}

impl StreamSession {
    /// Open a session on `camera`, paced at `interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(camera: Arc<Camera>, interval: Duration) -> Self {
        let guard = ClientGuard::random(camera.clients().clone());

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let state = if camera.slot().has_frame() {
            SessionState::Streaming
        } else {
            SessionState::AwaitFirstFrame
        };
        debug!(
            "Session {} opened on camera {} in state {}",
            guard.id(),
            camera.id(),
            state
        );

        Self {
            camera,
            ticker: Some(ticker),
            guard: Some(guard),
            state,
            last_emitted_sequence: None,
            frames_emitted: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Client id assigned to this session (None once closed)
    pub fn client_id(&self) -> Option<&str> {
        self.guard.as_ref().map(|g| g.id().as_str())
    }

    /// Sequence number of the last frame emitted
    pub fn last_emitted_sequence(&self) -> Option<u64> {
        self.last_emitted_sequence
    }

    /// Parts produced so far
    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    /// Wait for the next pacing tick that has a frame and return its part.
    ///
    /// Returns `None` once the session is closed. Cancel-safe: dropping the
    /// returned future leaves the session usable.
    pub async fn next_chunk(&mut self) -> Option<Bytes> {
        loop {
            self.ticker.as_mut()?.tick().await;

            let Some(frame) = self.camera.slot().read() else {
                continue;
            };

            if self.state == SessionState::AwaitFirstFrame {
                debug!(
                    "Camera {} produced its first frame, session streaming",
                    self.camera.id()
                );
                self.state = SessionState::Streaming;
            }
            self.last_emitted_sequence = Some(frame.sequence);
            self.frames_emitted += 1;
            return Some(create_mjpeg_part(frame.data()));
        }
    }

    /// Record that the last part was handed to the connection
    pub fn record_sent(&self) {
        if let Some(guard) = &self.guard {
            guard.record_frame_sent();
        }
    }

    /// Stop pacing and unregister the client
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;
        self.ticker = None;
        if let Some(guard) = self.guard.take() {
            debug!(
                "Session {} on camera {} closed after {} frames",
                guard.id(),
                self.camera.id(),
                self.frames_emitted
            );
        }
    }

    /// Turn the session into an HTTP body stream of multipart parts
    pub fn into_body_stream(self) -> impl Stream<Item = Result<Bytes, Infallible>> + Send {
        async_stream::stream! {
            let mut session = self;
            while let Some(part) = session.next_chunk().await {
                yield Ok::<Bytes, Infallible>(part);
                // Resumed only after hyper has taken the part.
                session.record_sent();
            }
        }
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::registry::CameraRegistry;
    use futures::StreamExt;
    use tokio::time::{timeout, Instant};

    const TICK: Duration = Duration::from_millis(33);

    fn camera() -> Arc<Camera> {
        let mut registry = CameraRegistry::new();
        registry
            .register("inspection", "/inspection_camera", "Inspection")
            .unwrap()
    }

    #[test]
    fn test_pacing_interval() {
        assert_eq!(pacing_interval(30), Duration::from_nanos(33_333_333));
        assert_eq!(pacing_interval(10), Duration::from_millis(100));
        assert_eq!(pacing_interval(0), Duration::from_millis(1000));
    }

    #[test]
    fn test_pacing_interval_high_fps_is_nonzero() {
        assert_eq!(pacing_interval(2000), Duration::from_micros(500));
        assert!(pacing_interval(u32::MAX) > Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_at_high_fps_streams() {
        let camera = camera();
        camera.slot().write(Bytes::from_static(b"jpeg"), 2, 2);

        let mut session = StreamSession::new(camera, pacing_interval(2000));
        assert!(session.next_chunk().await.is_some());
        assert!(session.next_chunk().await.is_some());
        assert_eq!(session.frames_emitted(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_first_frame() {
        let camera = camera();
        let mut session = StreamSession::new(camera.clone(), TICK);
        assert_eq!(session.state(), SessionState::AwaitFirstFrame);

        let idle = timeout(Duration::from_millis(500), session.next_chunk()).await;
        assert!(idle.is_err());
        assert_eq!(session.state(), SessionState::AwaitFirstFrame);
        assert_eq!(session.frames_emitted(), 0);

        camera.slot().write(Bytes::from_static(b"jpeg"), 2, 2);
        let part = session.next_chunk().await.unwrap();
        assert_eq!(part.as_ref(), b"--frame\r\nContent-Type: image/jpeg\r\n\r\njpeg\r\n");
        assert_eq!(session.state(), SessionState::Streaming);
        assert_eq!(session.last_emitted_sequence(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_at_pacing_interval() {
        let camera = camera();
        camera.slot().write(Bytes::from_static(b"jpeg"), 2, 2);

        let mut session = StreamSession::new(camera, TICK);
        assert_eq!(session.state(), SessionState::Streaming);

        session.next_chunk().await.unwrap();
        let start = Instant::now();
        for _ in 0..3 {
            session.next_chunk().await.unwrap();
        }
        assert!(start.elapsed() >= TICK * 3);
        assert_eq!(session.frames_emitted(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_closes_and_stops_reading() {
        let camera = camera();
        camera.slot().write(Bytes::from_static(b"jpeg"), 2, 2);

        let mut stream = Box::pin(StreamSession::new(camera.clone(), TICK).into_body_stream());
        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_some());
        assert_eq!(camera.clients().count(), 1);

        drop(stream);
        assert_eq!(camera.clients().count(), 0);

        let reads = camera.slot().read_count();
        tokio::time::sleep(TICK * 5).await;
        assert_eq!(camera.slot().read_count(), reads);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_is_terminal() {
        let camera = camera();
        camera.slot().write(Bytes::from_static(b"jpeg"), 2, 2);

        let mut session = StreamSession::new(camera.clone(), TICK);
        assert!(session.client_id().is_some());
        session.close();

        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.client_id().is_none());
        assert_eq!(camera.clients().count(), 0);

        let reads = camera.slot().read_count();
        assert!(session.next_chunk().await.is_none());
        assert_eq!(camera.slot().read_count(), reads);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_producer_slow_consumer_is_lossy() {
        let camera = camera();
        let writer_camera = camera.clone();
        let writer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(10));
            for i in 0..100u32 {
                ticker.tick().await;
                writer_camera
                    .slot()
                    .write(Bytes::from(i.to_be_bytes().to_vec()), 1, 1);
            }
        });

        let mut session = StreamSession::new(camera.clone(), TICK);
        let mut sequences = Vec::new();
        while sequences.len() < 25 {
            session.next_chunk().await.unwrap();
            sequences.push(session.last_emitted_sequence().unwrap());
        }
        writer.await.unwrap();

        assert!(sequences.windows(2).all(|w| w[0] <= w[1]));
        // Roughly three writes land between consecutive emissions.
        let last = *sequences.last().unwrap();
        assert!(last > sequences.len() as u64);
        assert_eq!(camera.slot().stats().frames_written, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_sessions() {
        let camera = camera();
        camera.slot().write(Bytes::from_static(b"jpeg"), 2, 2);

        let mut a = StreamSession::new(camera.clone(), TICK);
        let b = StreamSession::new(camera.clone(), TICK);
        assert_eq!(camera.clients().count(), 2);

        drop(b);
        assert_eq!(camera.clients().count(), 1);
        assert!(a.next_chunk().await.is_some());
    }
}
