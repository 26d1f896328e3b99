//! Semantic interlock events.
//!
//! [`IncomingEvent`] values are the event variables taught against received
//! bus events. [`OutgoingEvent`] ordinals are the event numbers this node
//! produces. Both carry a [`Polarity`] on the bus.

use std::fmt;

use blockline_proto::Polarity;

/// Event delivered to the interlock from the bus.
///
/// The discriminant is the event variable value taught for it. Values at or
/// above [`IncomingEvent::BOUND`] are invalid and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IncomingEvent {
    /// Commutator lock asserted (gate locked) or released.
    CommutatorLock = 0,
    /// Peer requests Line Clear.
    LineClear = 1,
    /// Peer reports the train entering the block.
    TrainOnTrack = 2,
    /// Peer reports the block cleared.
    BlockCleared = 3,
    /// Attention bell rung by the peer.
    AttentionBell = 4,
    /// Peer cancels Line Clear.
    ResetLineClear = 5,
    /// Peer acknowledged our Line Clear request.
    LineClearAck = 6,
    /// Peer acknowledged our Train On Track report.
    TrainOnTrackAck = 7,
    /// Peer acknowledged our Block Cleared report.
    BlockClearedAck = 8,
    /// Peer refused our Line Clear request.
    LineClearBlocked = 9,
}

impl IncomingEvent {
    /// First invalid event variable value.
    pub const BOUND: u8 = 10;

    /// Every incoming event in variable order.
    pub const ALL: [Self; 10] = [
        Self::CommutatorLock,
        Self::LineClear,
        Self::TrainOnTrack,
        Self::BlockCleared,
        Self::AttentionBell,
        Self::ResetLineClear,
        Self::LineClearAck,
        Self::TrainOnTrackAck,
        Self::BlockClearedAck,
        Self::LineClearBlocked,
    ];

    /// Cast an event variable. `None` if `variable >= BOUND`.
    #[must_use]
    pub fn from_variable(variable: u8) -> Option<Self> {
        Self::ALL.get(usize::from(variable)).copied()
    }

    /// Event variable value that selects this event.
    #[must_use]
    pub fn variable(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for IncomingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Event produced by this node.
///
/// The discriminant is the event number sent on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OutgoingEvent {
    /// Line Clear refused (gate locked).
    LineClearBlocked = 0,
    /// Line Clear granted.
    LineClearAck = 1,
    /// Train On Track accepted.
    TrainOnTrackAck = 2,
    /// Block Cleared accepted.
    BlockClearedAck = 3,
    /// Attention bell.
    AttentionBell = 4,
    /// Cancel Line Clear.
    ResetLineClear = 5,
    /// Request Line Clear.
    LineClear = 6,
    /// Report Train On Track.
    TrainOnTrack = 7,
    /// Report Block Cleared.
    BlockCleared = 8,
}

impl OutgoingEvent {
    /// Every outgoing event in event number order.
    pub const ALL: [Self; 9] = [
        Self::LineClearBlocked,
        Self::LineClearAck,
        Self::TrainOnTrackAck,
        Self::BlockClearedAck,
        Self::AttentionBell,
        Self::ResetLineClear,
        Self::LineClear,
        Self::TrainOnTrack,
        Self::BlockCleared,
    ];

    /// Event number this node sends for the event.
    #[must_use]
    pub fn event_number(self) -> u16 {
        u16::from(self as u8)
    }

    /// Event the peer teaches against this one.
    #[must_use]
    pub fn counterpart(self) -> IncomingEvent {
        match self {
            Self::LineClearBlocked => IncomingEvent::LineClearBlocked,
            Self::LineClearAck => IncomingEvent::LineClearAck,
            Self::TrainOnTrackAck => IncomingEvent::TrainOnTrackAck,
            Self::BlockClearedAck => IncomingEvent::BlockClearedAck,
            Self::AttentionBell => IncomingEvent::AttentionBell,
            Self::ResetLineClear => IncomingEvent::ResetLineClear,
            Self::LineClear => IncomingEvent::LineClear,
            Self::TrainOnTrack => IncomingEvent::TrainOnTrack,
            Self::BlockCleared => IncomingEvent::BlockCleared,
        }
    }
}

impl fmt::Display for OutgoingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An outgoing event and the edge to send it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Emission {
    /// Event to send
    pub event: OutgoingEvent,
    /// Edge to send
    pub polarity: Polarity,
}

impl Emission {
    /// Asserted send of `event`.
    #[must_use]
    pub const fn on(event: OutgoingEvent) -> Self {
        Self { event, polarity: Polarity::Asserted }
    }

    /// Released send of `event`.
    #[must_use]
    pub const fn off(event: OutgoingEvent) -> Self {
        Self { event, polarity: Polarity::Released }
    }
}

impl fmt::Display for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.event, self.polarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_at_or_above_bound_are_invalid() {
        for variable in 0..IncomingEvent::BOUND {
            let event = IncomingEvent::from_variable(variable).unwrap();
            assert_eq!(event.variable(), variable);
        }
        assert_eq!(IncomingEvent::from_variable(IncomingEvent::BOUND), None);
        assert_eq!(IncomingEvent::from_variable(u8::MAX), None);
    }

    #[test]
    fn event_numbers_are_ordinals() {
        for (ordinal, event) in OutgoingEvent::ALL.iter().enumerate() {
            assert_eq!(usize::from(event.event_number()), ordinal);
        }
    }

    #[test]
    fn counterparts_are_distinct_and_never_the_lock() {
        let mut seen: Vec<IncomingEvent> =
            OutgoingEvent::ALL.iter().map(|e| e.counterpart()).collect();
        seen.sort_by_key(|e| e.variable());
        seen.dedup();

        assert_eq!(seen.len(), OutgoingEvent::ALL.len());
        assert!(!seen.contains(&IncomingEvent::CommutatorLock));
    }
}
