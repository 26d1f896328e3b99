//! In-memory CAN bus.
//!
//! A single FIFO shared by every node. Frames are broadcast: delivery hands
//! the oldest frame to every instrument except the one that sent it. Nothing
//! is lost unless a test asks for it, and every loss is counted.

use std::collections::VecDeque;

use blockline_proto::CanFrame;

use crate::Side;

/// A frame in flight, with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFrame {
    /// Sending instrument, or `None` for a lever or other accessory node.
    pub from: Option<Side>,
    /// The frame.
    pub frame: CanFrame,
}

/// Broadcast bus with explicit delivery.
#[derive(Debug, Clone, Default)]
pub struct SimBus {
    pending: VecDeque<BusFrame>,
    sent: u64,
    delivered: u64,
    dropped: u64,
}

impl SimBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame for delivery.
    pub fn send(&mut self, from: Option<Side>, frame: CanFrame) {
        self.sent += 1;
        self.pending.push_back(BusFrame { from, frame });
    }

    /// Take the oldest frame for delivery.
    pub fn take_next(&mut self) -> Option<BusFrame> {
        let frame = self.pending.pop_front()?;
        self.delivered += 1;
        Some(frame)
    }

    /// Lose the oldest frame.
    pub fn drop_next(&mut self) -> Option<BusFrame> {
        let frame = self.pending.pop_front()?;
        self.dropped += 1;
        tracing::debug!(from = ?frame.from, identifier = frame.frame.identifier(), "frame lost");
        Some(frame)
    }

    /// Frames waiting for delivery, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &BusFrame> {
        self.pending.iter()
    }

    /// Whether nothing is in flight.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Frames ever queued.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Frames handed to receivers.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Frames lost on purpose.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
