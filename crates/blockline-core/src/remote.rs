//! Remote interlock state machine.
//!
//! The authoritative side of the block. It accepts exactly one request per
//! state and answers it with an acknowledgement (or, when the commutator gate
//! is locked, a refusal). Everything else is ignored, so there is never more
//! than one outstanding request.
//!
//! # State Machine
//!
//! ```text
//!            lineClear(on), gate released
//! ┌────────┐ ─────────────────────────────> ┌───────────┐
//! │ Normal │                                │ LineClear │
//! └────────┘ <──────────┐                   └───────────┘
//!     │                 │ blockCleared(on)        │ trainOnTrack(on)
//!     │ lineClear(on),  │                         ↓
//!     │ gate locked     │                  ┌──────────────┐
//!     ↓                 └──────────────────│ TrainOnTrack │
//! ┌───────────┐                            └──────────────┘
//! │ LCBlocked │ ── commutatorLock, gate now released ──> LineClear
//! └───────────┘
//! ```

use blockline_proto::Polarity;

use crate::{
    BlockState, CommutatorGate,
    event::{Emission, IncomingEvent, OutgoingEvent},
};

const GRANT: &[Emission] =
    &[Emission::off(OutgoingEvent::BlockClearedAck), Emission::on(OutgoingEvent::LineClearAck)];

const REFUSE: &[Emission] = &[Emission::on(OutgoingEvent::LineClearBlocked)];

const ACCEPT_TRAIN: &[Emission] =
    &[Emission::off(OutgoingEvent::LineClearAck), Emission::on(OutgoingEvent::TrainOnTrackAck)];

const ACCEPT_CLEAR: &[Emission] =
    &[Emission::off(OutgoingEvent::TrainOnTrackAck), Emission::on(OutgoingEvent::BlockClearedAck)];

const UNBLOCK: &[Emission] = &[
    Emission::off(OutgoingEvent::LineClearBlocked),
    Emission::off(OutgoingEvent::BlockClearedAck),
    Emission::on(OutgoingEvent::LineClearAck),
];

/// Transition table. `None` means the event is not accepted in `state`.
///
/// Request events only act on their asserted edge. `CommutatorLock` acts on
/// both edges; by the time it reaches here the gate already reflects it.
fn transition(
    state: BlockState,
    event: IncomingEvent,
    polarity: Polarity,
    gate_released: bool,
) -> Option<(BlockState, &'static [Emission])> {
    use BlockState as S;
    use IncomingEvent as E;

    let asserted = polarity.is_asserted();
    match (state, event) {
        (S::Normal, E::LineClear) if asserted => {
            if gate_released { Some((S::LineClear, GRANT)) } else { Some((S::LCBlocked, REFUSE)) }
        },
        (S::LineClear, E::TrainOnTrack) if asserted => Some((S::TrainOnTrack, ACCEPT_TRAIN)),
        (S::TrainOnTrack, E::BlockCleared) if asserted => Some((S::Normal, ACCEPT_CLEAR)),
        (S::LCBlocked, E::CommutatorLock) if gate_released => Some((S::LineClear, UNBLOCK)),
        _ => None,
    }
}

/// Authoritative block state for requests arriving from the peer.
///
/// Owns the commutator gate it consults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteInterlock {
    state: BlockState,
    gate: CommutatorGate,
}

impl RemoteInterlock {
    /// Create a machine in [`BlockState::Normal`] with a released gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current remote block state.
    #[must_use]
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Commutator gate consulted by Line Clear.
    #[must_use]
    pub fn gate(&self) -> &CommutatorGate {
        &self.gate
    }

    /// Process one incoming event and return what to send, in order.
    ///
    /// `CommutatorLock` updates the gate first and then re-evaluates the
    /// machine. Events not accepted in the current state return nothing and
    /// leave the state untouched.
    pub fn handle(&mut self, event: IncomingEvent, polarity: Polarity) -> Vec<Emission> {
        if event == IncomingEvent::CommutatorLock {
            self.gate.set_lock(polarity.is_asserted());
        }

        let Some((next, emissions)) =
            transition(self.state, event, polarity, self.gate.is_released())
        else {
            tracing::trace!(state = %self.state, %event, %polarity, "remote: event ignored");
            return Vec::new();
        };

        tracing::debug!(from = %self.state, to = %next, %event, "remote: transition");
        self.state = next;
        emissions.to_vec()
    }
}
