#![forbid(unsafe_code)]

//! Per-frame coalescing of high-frequency updates.
//!
//! Pointer moves during a drag can arrive many times between two animation
//! frames. Applying each of them is wasted work, so [`FrameCoalescer`] keeps
//! only the latest value and hands it out once when the host's frame callback
//! runs.
//!
//! # Usage
//!
//! ```
//! use quire_core::frame::FrameCoalescer;
//!
//! let mut frames = FrameCoalescer::new();
//! assert!(!frames.schedule(10));
//! assert!(frames.schedule(20)); // superseded the pending 10
//!
//! assert_eq!(frames.on_frame(), Some(20));
//! assert_eq!(frames.on_frame(), None);
//! ```
//!
//! # Invariants
//!
//! - At most one value is pending at any time ("latest wins").
//! - [`FrameCoalescer::cancel`] drops the pending value without delivering it.

/// Latest-wins holder for a value waiting on the next animation frame.
///
/// Not thread-safe; owned by a single event loop.
#[derive(Debug, Clone)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    superseded: u64,
    delivered: u64,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            superseded: 0,
            delivered: 0,
        }
    }
}

impl<T> FrameCoalescer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `value` for the next frame.
    ///
    /// Returns `true` if an undelivered value was replaced.
    pub fn schedule(&mut self, value: T) -> bool {
        let replaced = self.pending.replace(value).is_some();
        if replaced {
            self.superseded = self.superseded.saturating_add(1);
        }
        replaced
    }

    /// Frame callback: take the pending value, if any.
    pub fn on_frame(&mut self) -> Option<T> {
        let value = self.pending.take();
        if value.is_some() {
            self.delivered = self.delivered.saturating_add(1);
        }
        value
    }

    /// Drop the pending value. Returns it so callers can decide to flush it
    /// instead.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Whether a frame callback is outstanding.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Peek at the pending value.
    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Number of values replaced before delivery since creation.
    #[must_use]
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }

    /// Number of values delivered by [`on_frame`](Self::on_frame).
    #[must_use]
    pub fn delivered_count(&self) -> u64 {
        self.delivered
    }
}

#[cfg(test)]
mod tests {
    use super::FrameCoalescer;

    #[test]
    fn empty_frame_delivers_nothing() {
        let mut frames: FrameCoalescer<u32> = FrameCoalescer::new();
        assert_eq!(frames.on_frame(), None);
        assert_eq!(frames.delivered_count(), 0);
    }

    #[test]
    fn latest_value_wins_within_a_frame() {
        let mut frames = FrameCoalescer::new();
        frames.schedule(1);
        frames.schedule(2);
        frames.schedule(3);
        assert_eq!(frames.superseded_count(), 2);
        assert_eq!(frames.on_frame(), Some(3));
        assert!(!frames.has_pending());
    }

    #[test]
    fn each_frame_delivers_at_most_once() {
        let mut frames = FrameCoalescer::new();
        frames.schedule("a");
        assert_eq!(frames.on_frame(), Some("a"));
        assert_eq!(frames.on_frame(), None);
        frames.schedule("b");
        assert_eq!(frames.on_frame(), Some("b"));
        assert_eq!(frames.delivered_count(), 2);
        assert_eq!(frames.superseded_count(), 0);
    }

    #[test]
    fn cancel_drops_pending() {
        let mut frames = FrameCoalescer::new();
        frames.schedule(7);
        assert_eq!(frames.pending(), Some(&7));
        assert_eq!(frames.cancel(), Some(7));
        assert_eq!(frames.on_frame(), None);
        assert_eq!(frames.delivered_count(), 0);
    }
}
