//! Latest-frame holder for one camera
//!
//! A `FrameSlot` keeps only the newest encoded frame. The writer publishes a
//! fully built `Arc<EncodedFrame>` with a single pointer swap, so a reader
//! always gets either the previous complete frame or the new complete frame.
//! Nothing is queued: a reader that is slower than the writer simply skips
//! the frames it never saw.

use arc_swap::ArcSwapOption;
use bytes::Bytes;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::trace;

use crate::video::{EncodedFrame, Resolution};

/// Snapshot of slot counters
#[derive(Debug, Clone, Default, Serialize)]
pub struct SlotStats {
    /// Whether a frame has been published yet
    pub has_frame: bool,
    /// Width of the latest frame
    pub width: Option<u32>,
    /// Height of the latest frame
    pub height: Option<u32>,
    /// Sequence number of the latest frame (0 before the first write)
    pub sequence: u64,
    /// Frames published since startup
    pub frames_written: u64,
    /// Raw frames dropped because encoding failed
    pub encode_failures: u64,
    /// Reads served to sessions and snapshots
    pub reads: u64,
}

/// Single-writer, multi-reader holder of the most recent encoded frame
pub struct FrameSlot {
    /// Current frame, swapped atomically as a whole
    current: ArcSwapOption<EncodedFrame>,
    /// Last assigned sequence number
    sequence: AtomicU64,
    /// Frames published
    frames_written: AtomicU64,
    /// Encoder failures reported by the ingestor
    encode_failures: AtomicU64,
    /// Reads served
    reads: AtomicU64,
}

impl FrameSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
            sequence: AtomicU64::new(0),
            frames_written: AtomicU64::new(0),
            encode_failures: AtomicU64::new(0),
            reads: AtomicU64::new(0),
        }
    }

    /// Replace the stored frame.
    ///
    /// Returns the sequence number assigned to the new frame, or `None` when
    /// `payload` is empty (an empty payload never replaces a good frame).
    pub fn write(&self, payload: Bytes, width: u32, height: u32) -> Option<u64> {
        self.write_frame(payload, Resolution::new(width, height), Instant::now())
    }

    /// Replace the stored frame, keeping the capture timestamp of its source
    pub fn write_frame(
        &self,
        payload: Bytes,
        resolution: Resolution,
        capture_ts: Instant,
    ) -> Option<u64> {
        if payload.is_empty() {
            trace!("Ignoring empty frame payload");
            return None;
        }

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let frame = EncodedFrame::new(payload, resolution, sequence, capture_ts);
        self.current.store(Some(Arc::new(frame)));
        self.frames_written.fetch_add(1, Ordering::Relaxed);
        Some(sequence)
    }

    /// Get an immutable snapshot of the current frame (if any)
    pub fn read(&self) -> Option<Arc<EncodedFrame>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.current.load_full()
    }

    /// Check for a frame without counting a read
    pub fn has_frame(&self) -> bool {
        self.current.load().is_some()
    }

    /// Record a raw frame that could not be encoded
    pub fn record_encode_failure(&self) {
        self.encode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of reads served so far
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Get slot statistics
    pub fn stats(&self) -> SlotStats {
        let current = self.current.load();
        let (width, height, sequence) = match current.as_deref() {
            Some(frame) => (Some(frame.width()), Some(frame.height()), frame.sequence),
            None => (None, None, 0),
        };

        SlotStats {
            has_frame: current.is_some(),
            width,
            height,
            sequence,
            frames_written: self.frames_written.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
        }
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::thread;

    #[test]
    fn test_empty_slot() {
        let slot = FrameSlot::new();
        assert!(slot.read().is_none());
        assert!(!slot.has_frame());

        let stats = slot.stats();
        assert!(!stats.has_frame);
        assert_eq!(stats.sequence, 0);
        assert_eq!(stats.reads, 1);
    }

    #[test]
    fn test_latest_write_wins() {
        let slot = FrameSlot::new();
        assert_eq!(slot.write(Bytes::from_static(b"first"), 2, 2), Some(1));
        assert_eq!(slot.write(Bytes::from_static(b"second"), 4, 4), Some(2));

        let frame = slot.read().unwrap();
        assert_eq!(frame.data(), b"second");
        assert_eq!(frame.sequence, 2);
        assert_eq!((frame.width(), frame.height()), (4, 4));
        assert_eq!(slot.stats().frames_written, 2);
    }

    #[test]
    fn test_empty_payload_keeps_previous_frame() {
        let slot = FrameSlot::new();
        slot.write(Bytes::from_static(b"good"), 1, 1);
        assert_eq!(slot.write(Bytes::new(), 1, 1), None);
        assert_eq!(slot.read().unwrap().data(), b"good");
    }

    #[test]
    fn test_snapshot_survives_later_writes() {
        let slot = FrameSlot::new();
        slot.write(Bytes::from_static(b"old"), 1, 1);
        let held = slot.read().unwrap();
        slot.write(Bytes::from_static(b"new"), 1, 1);
        assert_eq!(held.data(), b"old");
        assert_eq!(slot.read().unwrap().data(), b"new");
    }

    #[test]
    fn test_concurrent_reads_never_torn() {
        const PAYLOAD_LEN: usize = 64 * 1024;

        let slot = Arc::new(FrameSlot::new());
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let slot = slot.clone();
                let done = done.clone();
                thread::spawn(move || {
                    let mut last_seq = 0;
                    while !done.load(Ordering::Relaxed) {
                        if let Some(frame) = slot.read() {
                            let first = frame.data()[0];
                            assert_eq!(frame.len(), PAYLOAD_LEN);
                            assert!(frame.data().iter().all(|&b| b == first));
                            assert!(frame.sequence >= last_seq);
                            last_seq = frame.sequence;
                        }
                    }
                })
            })
            .collect();

        for i in 0..500u32 {
            let fill = (i % 251) as u8 + 1;
            slot.write(Bytes::from(vec![fill; PAYLOAD_LEN]), 1, 1);
        }
        done.store(true, Ordering::Relaxed);

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(slot.stats().frames_written, 500);
    }

    #[test]
    fn test_fast_writer_keeps_single_frame() {
        let slot = FrameSlot::new();
        let mut held = None;
        for i in 0..1000u32 {
            slot.write(Bytes::from(i.to_be_bytes().to_vec()), 1, 1);
            if i == 10 {
                held = slot.read();
            }
        }
        // Only the frame a reader still holds and the current one are alive.
        let held = held.unwrap();
        assert_eq!(Arc::strong_count(&held), 1);
        assert_eq!(slot.read().unwrap().data(), &999u32.to_be_bytes());
    }

    #[test]
    fn test_encode_failure_counter() {
        let slot = FrameSlot::new();
        slot.record_encode_failure();
        slot.record_encode_failure();
        assert_eq!(slot.stats().encode_failures, 2);
    }
}
