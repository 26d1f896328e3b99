//! Instrument: one node's interlock, dispatched.
//!
//! This module defines the [`Instrument`], which owns everything a block
//! instrument node holds for its lifetime and routes each input to the side
//! of the interlock it belongs to.
//!
//! This is a pure state machine: it consumes switch edges, frames and ticks
//! and produces [`crate::InstrumentAction`]s for the runtime to execute.
//!
//! # Routing
//!
//! - Block switches go to the local side, which may send a request.
//! - `commutatorLock` and the peer's requests go to the remote side.
//! - Acknowledgements (asserted edge) go to the local side.
//! - `attentionBell` drives the bell output.
//!
//! Every handled switch edge and learned frame ends in exactly one render,
//! even when nothing changed.

use std::{ops::Sub, time::Duration};

use blockline_core::{
    BlockState, ConfigError, Emission, EventCodec, EventTable, IncomingEvent, IndicatorVector, Lamp,
    LocalInterlock, MemoryEventTable, NodeConfig, RemoteInterlock, RequestWatchdog, Switch,
    local::requested_state, project,
};
use blockline_proto::{AccessoryEvent, CanFrame, Polarity};

use crate::{InstrumentAction, InstrumentEvent, SwitchEdge};

/// Block instrument state machine.
///
/// Generic over the event table (configuration storage) and the time type,
/// so simulations can use virtual clocks.
#[derive(Debug, Clone)]
pub struct Instrument<T, I> {
    /// Encodes our sends, decodes learned events.
    codec: EventCodec,
    /// Taught events.
    table: T,
    /// Authoritative side, owns the commutator gate.
    remote: RemoteInterlock,
    /// Requesting side.
    local: LocalInterlock,
    /// Outstanding local request.
    watchdog: RequestWatchdog<I>,
    /// Bell output, follows the last received attention bell edge.
    bell: bool,
}

impl<I> Instrument<MemoryEventTable, I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Build an instrument from a validated node configuration.
    pub fn from_config(config: &NodeConfig) -> Result<Self, ConfigError> {
        let table = config.event_table()?;
        let codec = EventCodec::new(config.node_number, config.can_id);
        Ok(Self::new(codec, table, config.request_timeout()))
    }
}

impl<T, I> Instrument<T, I>
where
    T: EventTable,
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create an instrument with both sides `Normal` and the gate released.
    pub fn new(codec: EventCodec, table: T, request_timeout: Option<Duration>) -> Self {
        Self {
            codec,
            table,
            remote: RemoteInterlock::new(),
            local: LocalInterlock::new(),
            watchdog: RequestWatchdog::new(request_timeout),
            bell: false,
        }
    }

    /// Process one input and return actions.
    pub fn handle(&mut self, event: InstrumentEvent, now: I) -> Vec<InstrumentAction> {
        match event {
            InstrumentEvent::Switch(edge) => self.handle_switch(edge, now),
            InstrumentEvent::Frame(frame) => self.receive_frame(&frame),
            InstrumentEvent::Tick => self.handle_tick(now),
        }
    }

    /// Process a debounced panel switch edge.
    ///
    /// The bell sends on both edges in any state. Block switches act on the
    /// press edge, and only the switch armed for the local state sends
    /// anything. The local state itself never moves here.
    pub fn handle_switch(&mut self, edge: SwitchEdge, now: I) -> Vec<InstrumentAction> {
        let emissions = match edge.switch {
            Switch::Bell => vec![self.local.bell(edge.pressed)],
            _ if !edge.pressed => Vec::new(),
            switch => {
                let sends = self.local.request_advance(switch);
                if !sends.is_empty()
                    && let Some(expected) = requested_state(self.local.state())
                {
                    tracing::debug!(%switch, %expected, "request sent");
                    self.watchdog.record(expected, now);
                }
                sends
            },
        };
        self.respond(emissions)
    }

    /// Process a frame from the bus.
    ///
    /// Only accessory events found in the event table are handled. Anything
    /// else produces no actions at all, not even a render.
    pub fn receive_frame(&mut self, frame: &CanFrame) -> Vec<InstrumentAction> {
        let Ok(accessory) = AccessoryEvent::from_frame(frame) else {
            tracing::trace!(opcode = ?frame.opcode(), "frame is not an accessory event");
            return Vec::new();
        };
        let Some(index) = self.table.find(&accessory) else {
            tracing::trace!(key = ?accessory.key(), "event not taught");
            return Vec::new();
        };
        self.handle_learned(index, frame)
    }

    /// Process a learned event found at `index` in the event table.
    ///
    /// Always re-renders, whether or not the event decoded or changed
    /// anything.
    pub fn handle_learned(&mut self, index: u8, frame: &CanFrame) -> Vec<InstrumentAction> {
        let emissions = match EventCodec::decode_learned(&self.table, index, frame) {
            Some((event, polarity)) => self.route(event, polarity),
            None => Vec::new(),
        };
        self.respond(emissions)
    }

    /// Advance time for the request watchdog.
    ///
    /// Renders only when a request has just gone stale.
    pub fn handle_tick(&mut self, now: I) -> Vec<InstrumentAction> {
        if self.watchdog.tick(now) {
            vec![InstrumentAction::Render(self.indicators())]
        } else {
            Vec::new()
        }
    }

    fn route(&mut self, event: IncomingEvent, polarity: Polarity) -> Vec<Emission> {
        match event {
            IncomingEvent::CommutatorLock
            | IncomingEvent::LineClear
            | IncomingEvent::TrainOnTrack
            | IncomingEvent::BlockCleared => self.remote.handle(event, polarity),

            IncomingEvent::LineClearAck
            | IncomingEvent::TrainOnTrackAck
            | IncomingEvent::BlockClearedAck
            | IncomingEvent::LineClearBlocked => {
                if polarity.is_asserted() && self.local.apply_ack(event).is_some() {
                    self.watchdog.resolve();
                }
                Vec::new()
            },

            IncomingEvent::AttentionBell => {
                self.bell = polarity.is_asserted();
                Vec::new()
            },

            IncomingEvent::ResetLineClear => {
                tracing::trace!(%polarity, "reset line clear ignored");
                Vec::new()
            },
        }
    }

    fn respond(&self, emissions: Vec<Emission>) -> Vec<InstrumentAction> {
        let mut actions: Vec<InstrumentAction> = emissions
            .into_iter()
            .filter_map(|e| match self.codec.encode(e) {
                Ok(frame) => Some(InstrumentAction::Send(frame)),
                Err(error) => {
                    tracing::warn!(event = ?e.event, %error, "send dropped: frame rejected");
                    None
                },
            })
            .collect();
        actions.push(InstrumentAction::Render(self.indicators()));
        actions
    }

    /// Current panel outputs: the state projection plus bell and module lamp.
    pub fn indicators(&self) -> IndicatorVector {
        let mut indicators = project(self.remote.state(), self.local.state());
        indicators.bell = self.bell;
        indicators.module = if self.watchdog.is_stale() { Lamp::Blink } else { Lamp::Off };
        indicators
    }

    /// Authoritative block state for the peer's requests.
    pub fn remote_state(&self) -> BlockState {
        self.remote.state()
    }

    /// Last acknowledged state of our own requests.
    pub fn local_state(&self) -> BlockState {
        self.local.state()
    }

    /// Whether the commutator gate is released.
    pub fn gate_released(&self) -> bool {
        self.remote.gate().is_released()
    }

    /// Whether the bell is ringing.
    pub fn bell(&self) -> bool {
        self.bell
    }

    /// Request watchdog.
    pub fn watchdog(&self) -> &RequestWatchdog<I> {
        &self.watchdog
    }

    /// Codec identity (node number, CAN id).
    pub fn codec(&self) -> &EventCodec {
        &self.codec
    }

    /// Event table.
    pub fn table(&self) -> &T {
        &self.table
    }

    /// Event table, for teaching at runtime.
    pub fn table_mut(&mut self) -> &mut T {
        &mut self.table
    }
}
