//! Local interlock state machine.
//!
//! Tracks the requests made from this panel. Pressing a switch only *sends* a
//! request; `localState` moves solely when the peer's acknowledgement arrives.
//! A refused or superseded request is therefore reflected correctly no matter
//! when the operator pressed what.
//!
//! Which switch is live in each state is an explicit table ([`armed_switch`]):
//! exactly one block switch is armed per state, none in `LCBlocked`.

use std::fmt;

use blockline_proto::Polarity;

use crate::{
    BlockState,
    event::{Emission, IncomingEvent, OutgoingEvent},
};

/// Operator controls on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Switch {
    /// Request Line Clear.
    LineClear,
    /// Report Train On Track.
    TrainOnTrack,
    /// Report the block Normal again.
    Normal,
    /// Attention bell push.
    Bell,
}

impl Switch {
    /// All panel controls.
    pub const ALL: [Self; 4] = [Self::LineClear, Self::TrainOnTrack, Self::Normal, Self::Bell];
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LineClear => "line clear",
            Self::TrainOnTrack => "train on track",
            Self::Normal => "normal",
            Self::Bell => "bell",
        };
        f.write_str(name)
    }
}

/// One armed step: the switch live in a state, the state its request asks
/// for, and what it sends.
struct Step {
    from: BlockState,
    switch: Switch,
    requests: BlockState,
    sends: [Emission; 2],
}

static STEPS: [Step; 3] = [
    Step {
        from: BlockState::Normal,
        switch: Switch::LineClear,
        requests: BlockState::LineClear,
        sends: [Emission::off(OutgoingEvent::BlockCleared), Emission::on(OutgoingEvent::LineClear)],
    },
    Step {
        from: BlockState::LineClear,
        switch: Switch::TrainOnTrack,
        requests: BlockState::TrainOnTrack,
        sends: [Emission::off(OutgoingEvent::LineClear), Emission::on(OutgoingEvent::TrainOnTrack)],
    },
    Step {
        from: BlockState::TrainOnTrack,
        switch: Switch::Normal,
        requests: BlockState::Normal,
        sends: [
            Emission::off(OutgoingEvent::TrainOnTrack),
            Emission::on(OutgoingEvent::BlockCleared),
        ],
    },
];

fn step(state: BlockState) -> Option<&'static Step> {
    STEPS.iter().find(|s| s.from == state)
}

/// The block switch armed in `state`. `None` in `LCBlocked`.
#[must_use]
pub fn armed_switch(state: BlockState) -> Option<Switch> {
    step(state).map(|s| s.switch)
}

/// The state a request from `state` asks the peer for.
#[must_use]
pub fn requested_state(state: BlockState) -> Option<BlockState> {
    step(state).map(|s| s.requests)
}

/// Request to send when `switch` is pressed in `state`.
///
/// Empty unless `switch` is the armed one.
#[must_use]
pub fn request_advance(state: BlockState, switch: Switch) -> Vec<Emission> {
    match step(state) {
        Some(s) if s.switch == switch => s.sends.to_vec(),
        _ => Vec::new(),
    }
}

/// State an acknowledgement moves the local side to. `None` if `event` is not
/// an acknowledgement.
#[must_use]
pub fn ack_target(event: IncomingEvent) -> Option<BlockState> {
    match event {
        IncomingEvent::LineClearAck => Some(BlockState::LineClear),
        IncomingEvent::TrainOnTrackAck => Some(BlockState::TrainOnTrack),
        IncomingEvent::BlockClearedAck => Some(BlockState::Normal),
        IncomingEvent::LineClearBlocked => Some(BlockState::LCBlocked),
        _ => None,
    }
}

/// What the peer last acknowledged for requests made from this panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalInterlock {
    state: BlockState,
}

impl LocalInterlock {
    /// Create a machine in [`BlockState::Normal`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current local block state.
    #[must_use]
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Request to send for a press of `switch`. Never changes the state.
    #[must_use]
    pub fn request_advance(&self, switch: Switch) -> Vec<Emission> {
        let sends = request_advance(self.state, switch);
        if sends.is_empty() {
            tracing::trace!(state = %self.state, %switch, "local: switch not armed");
        }
        sends
    }

    /// Apply an acknowledgement from the peer.
    ///
    /// Sets the state unconditionally, whatever it was before. Returns the new
    /// state, or `None` (state untouched) if `event` is not an
    /// acknowledgement.
    pub fn apply_ack(&mut self, event: IncomingEvent) -> Option<BlockState> {
        let target = ack_target(event)?;
        if target != self.state {
            tracing::debug!(from = %self.state, to = %target, %event, "local: acknowledged");
        }
        self.state = target;
        Some(target)
    }

    /// Bell edge to send. Independent of the block state.
    #[must_use]
    pub fn bell(&self, pressed: bool) -> Emission {
        Emission { event: OutgoingEvent::AttentionBell, polarity: Polarity::from_bool(pressed) }
    }
}
