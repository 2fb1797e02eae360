//! Single-slot "latest wins" frame handoff
//!
//! The producer overwrites, the consumer reads a snapshot. Nothing is queued:
//! a fast producer never blocks and an idle one leaves the last frame in place.

use parking_lot::Mutex;

use crate::frame::VideoFrame;

/// Holds the most recently delivered frame
#[derive(Debug)]
pub struct FrameInbox<T = VideoFrame> {
    slot: Mutex<Option<T>>,
}

impl<T> Default for FrameInbox<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> FrameInbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held frame. The previous one is dropped outside the lock.
    pub fn deliver(&self, frame: T) {
        let previous = self.slot.lock().replace(frame);
        drop(previous);
    }

    /// Snapshot of the held frame, or `None` before the first delivery
    pub fn latest(&self) -> Option<T> {
        self.slot.lock().clone()
    }
}
