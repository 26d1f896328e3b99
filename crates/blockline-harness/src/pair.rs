//! Two instruments at either end of one block.
//!
//! [`InstrumentPair`] owns both instruments, the commutator lever guarding
//! each, a shared [`SimBus`] and a virtual clock. Each instrument's sends go
//! onto the bus and reach the other instrument only when delivered, so tests
//! decide exactly how far each message has travelled.
//!
//! # Wiring
//!
//! ```text
//!   lever A ─┐                       ┌─ lever B
//!            ▼                       ▼
//!   ┌──────────────┐   SimBus   ┌──────────────┐
//!   │ instrument A │ ◄────────► │ instrument B │
//!   └──────────────┘            └──────────────┘
//! ```
//!
//! Every frame is broadcast. Each instrument is taught its peer's events and
//! its own lever only, so the event table does the filtering.

use std::time::Duration;

use blockline_app::{Instrument, InstrumentAction, InstrumentEvent, SwitchEdge};
use blockline_core::{
    ConfigError, IncomingEvent, IndicatorVector, MemoryEventTable, NodeConfig, Switch,
};
use blockline_proto::{AccessoryEvent, CanFrame, Polarity};

use crate::{
    Operation, PairSnapshot, Side, SideSnapshot, SimBus, SimInstant,
    invariants::InvariantRegistry,
};

/// CAN id used by lever frames; lever B uses the next one.
const LEVER_CAN_ID: u8 = 90;

/// Upper bound on deliveries in one [`InstrumentPair::settle`].
const SETTLE_LIMIT: usize = 1024;

/// Configurations of a cross-taught pair.
///
/// Node 101 and node 102 are taught each other's events. Each is also taught
/// event 1 of its own commutator lever: node 201 guards A, node 202 guards B.
pub fn standard_configs() -> [NodeConfig; 2] {
    let mut a = NodeConfig::new(101, 11);
    a.teach_peer(102);
    a.teach_commutator(201, 1);

    let mut b = NodeConfig::new(102, 12);
    b.teach_peer(101);
    b.teach_commutator(202, 1);

    [a, b]
}

/// One end of the block.
#[derive(Debug, Clone)]
struct Node {
    instrument: Instrument<MemoryEventTable, SimInstant>,
    consume_own_events: bool,
    /// Long event the lever produces, if a lever is taught.
    lever: Option<(u16, u16)>,
    lever_locked: bool,
    /// Last indications pushed to the panel.
    rendered: IndicatorVector,
    renders: u64,
}

impl Node {
    fn from_config(config: &NodeConfig) -> Result<Self, ConfigError> {
        let instrument = Instrument::from_config(config)?;
        let lever = config
            .events
            .iter()
            .find(|e| e.variable == IncomingEvent::CommutatorLock.variable())
            .map(|e| (e.node_number, e.event_number));
        let rendered = instrument.indicators();

        Ok(Self {
            instrument,
            consume_own_events: config.consume_own_events,
            lever,
            lever_locked: false,
            rendered,
            renders: 1,
        })
    }
}

/// Two instruments, two levers, one bus.
pub struct InstrumentPair {
    nodes: [Node; 2],
    bus: SimBus,
    now: SimInstant,
    invariants: Option<InvariantRegistry>,
}

impl Default for InstrumentPair {
    fn default() -> Self {
        Self::new()
    }
}

impl InstrumentPair {
    /// Create a pair from [`standard_configs`].
    pub fn new() -> Self {
        let [a, b] = standard_configs();
        match Self::from_configs(&a, &b) {
            Ok(pair) => pair,
            Err(e) => unreachable!("standard configs are valid: {e}"),
        }
    }

    /// Create a pair from two node configurations.
    ///
    /// Each side's lever is the first event taught as `commutatorLock`.
    /// Without one, lever operations on that side do nothing.
    pub fn from_configs(a: &NodeConfig, b: &NodeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            nodes: [Node::from_config(a)?, Node::from_config(b)?],
            bus: SimBus::new(),
            now: SimInstant::ZERO,
            invariants: None,
        })
    }

    /// Check invariants after every operation applied through
    /// [`Self::apply`].
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Apply one operation.
    ///
    /// # Panics
    ///
    /// Panics if invariants are enabled and one is violated.
    pub fn apply(&mut self, op: &Operation) {
        tracing::trace!(?op, "apply");
        match *op {
            Operation::Press { side, switch } => self.press(side, switch.into()),
            Operation::Release { side, switch } => self.release(side, switch.into()),
            Operation::Lever { side, locked } => self.set_lever(side, locked),
            Operation::DeliverNext => {
                self.deliver_next();
            },
            Operation::DropNext => {
                self.bus.drop_next();
            },
            Operation::Settle => {
                self.settle();
            },
            Operation::AdvanceTime { millis } => {
                self.advance(Duration::from_millis(u64::from(millis)));
            },
        }

        if let Some(registry) = &self.invariants {
            registry.assert_all(&self.snapshot(), &format!("after {op:?}"));
        }
    }

    /// Press a panel switch.
    pub fn press(&mut self, side: Side, switch: Switch) {
        self.input(side, InstrumentEvent::Switch(SwitchEdge::press(switch)));
    }

    /// Release a panel switch.
    pub fn release(&mut self, side: Side, switch: Switch) {
        self.input(side, InstrumentEvent::Switch(SwitchEdge::release(switch)));
    }

    /// Press and release a panel switch.
    pub fn operate(&mut self, side: Side, switch: Switch) {
        self.press(side, switch);
        self.release(side, switch);
    }

    /// Move the lever guarding `side`. The lever sends on every move, even
    /// to the position it is already in.
    pub fn set_lever(&mut self, side: Side, locked: bool) {
        let node = &mut self.nodes[side.index()];
        let Some((node_number, event_number)) = node.lever else {
            tracing::debug!(%side, "no lever taught");
            return;
        };
        node.lever_locked = locked;

        let can_id = LEVER_CAN_ID + side.index() as u8;
        let event = AccessoryEvent::long(node_number, event_number, Polarity::from_bool(locked));
        match event.to_frame(can_id) {
            Ok(frame) => self.bus.send(None, frame),
            Err(e) => tracing::warn!(%side, error = %e, "lever frame rejected"),
        }
    }

    /// Deliver the oldest frame on the bus to every instrument but its
    /// sender (and to the sender too, when it consumes its own events).
    ///
    /// Returns `false` if the bus was idle.
    pub fn deliver_next(&mut self) -> bool {
        let Some(bus_frame) = self.bus.take_next() else {
            return false;
        };

        for side in Side::BOTH {
            let own = bus_frame.from == Some(side);
            if own && !self.nodes[side.index()].consume_own_events {
                continue;
            }
            self.input(side, InstrumentEvent::Frame(bus_frame.frame));
        }
        true
    }

    /// Deliver until the bus is idle. Returns the number of frames delivered.
    pub fn settle(&mut self) -> usize {
        let mut delivered = 0;
        while delivered < SETTLE_LIMIT && self.deliver_next() {
            delivered += 1;
        }
        if !self.bus.is_idle() {
            tracing::warn!(delivered, "bus still busy after settle limit");
        }
        delivered
    }

    /// Advance the clock and tick both instruments.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        for side in Side::BOTH {
            self.input(side, InstrumentEvent::Tick);
        }
    }

    fn input(&mut self, side: Side, event: InstrumentEvent) {
        let now = self.now;
        let node = &mut self.nodes[side.index()];
        let actions = node.instrument.handle(event, now);

        for action in actions {
            match action {
                InstrumentAction::Send(frame) => self.bus.send(Some(side), frame),
                InstrumentAction::Render(indicators) => {
                    if indicators != node.rendered {
                        tracing::debug!(%side, ?indicators, "indications changed");
                    }
                    node.rendered = indicators;
                    node.renders += 1;
                },
            }
        }
    }

    /// Instrument at `side`.
    pub fn instrument(&self, side: Side) -> &Instrument<MemoryEventTable, SimInstant> {
        &self.nodes[side.index()].instrument
    }

    /// Last indications rendered at `side`.
    pub fn rendered(&self, side: Side) -> &IndicatorVector {
        &self.nodes[side.index()].rendered
    }

    /// Number of renders at `side`, including the power-on render.
    pub fn render_count(&self, side: Side) -> u64 {
        self.nodes[side.index()].renders
    }

    /// Whether the lever guarding `side` is locked.
    pub fn lever_locked(&self, side: Side) -> bool {
        self.nodes[side.index()].lever_locked
    }

    /// Inject a raw frame onto the bus, as if from an unrelated node.
    pub fn inject(&mut self, frame: CanFrame) {
        self.bus.send(None, frame);
    }

    /// The bus.
    pub fn bus(&self) -> &SimBus {
        &self.bus
    }

    /// Current simulated time.
    pub fn now(&self) -> SimInstant {
        self.now
    }

    /// Capture the observable state of both sides.
    pub fn snapshot(&self) -> PairSnapshot {
        let side = |side: Side| {
            let node = &self.nodes[side.index()];
            let instrument = &node.instrument;
            SideSnapshot {
                remote: instrument.remote_state(),
                local: instrument.local_state(),
                gate_released: instrument.gate_released(),
                lever_locked: node.lever.is_some().then_some(node.lever_locked),
                bell: instrument.bell(),
                stale: instrument.watchdog().is_stale(),
                indicators: instrument.indicators(),
                rendered: node.rendered,
            }
        };

        PairSnapshot {
            sides: [side(Side::A), side(Side::B)],
            quiescent: self.bus.is_idle(),
            lossless: self.bus.dropped() == 0,
        }
    }
}
