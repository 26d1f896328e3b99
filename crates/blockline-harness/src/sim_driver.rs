//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` replays a script of inputs against virtual time and captures
//! everything the runtime sends and renders. It implements [`Driver`] so the
//! same [`blockline_app::Runtime`] orchestration code runs in both the node
//! and in simulation.

use std::{collections::VecDeque, time::Duration};

use blockline_app::{Driver, InstrumentEvent, SwitchEdge};
use blockline_core::IndicatorVector;
use blockline_proto::CanFrame;

use crate::SimInstant;

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// One scripted step.
#[derive(Debug, Clone)]
enum Scripted {
    Input(InstrumentEvent),
    Advance(Duration),
}

/// Simulation driver for deterministic testing.
///
/// Input ends when the script runs out, so [`blockline_app::Runtime::run`]
/// returns once everything injected has been processed.
#[derive(Debug, Default)]
pub struct SimDriver {
    script: VecDeque<Scripted>,
    now: SimInstant,
    sent: Vec<CanFrame>,
    renders: Vec<IndicatorVector>,
    fail_sends: bool,
    stopped: bool,
}

impl SimDriver {
    /// Create a driver with an empty script at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an input.
    pub fn inject_event(&mut self, event: InstrumentEvent) {
        self.script.push_back(Scripted::Input(event));
    }

    /// Queue a switch edge.
    pub fn inject_switch(&mut self, edge: SwitchEdge) {
        self.inject_event(InstrumentEvent::Switch(edge));
    }

    /// Queue a frame from the bus.
    pub fn inject_frame(&mut self, frame: CanFrame) {
        self.inject_event(InstrumentEvent::Frame(frame));
    }

    /// Queue a tick.
    pub fn inject_tick(&mut self) {
        self.inject_event(InstrumentEvent::Tick);
    }

    /// Queue a clock advance, applied before the next input is returned.
    pub fn inject_advance(&mut self, by: Duration) {
        self.script.push_back(Scripted::Advance(by));
    }

    /// Make every later send fail.
    pub fn fail_sends(&mut self) {
        self.fail_sends = true;
    }

    /// Take all captured outgoing frames.
    pub fn take_sent(&mut self) -> Vec<CanFrame> {
        std::mem::take(&mut self.sent)
    }

    /// Every render so far, oldest first.
    pub fn renders(&self) -> &[IndicatorVector] {
        &self.renders
    }

    /// Most recent render.
    pub fn last_render(&self) -> Option<&IndicatorVector> {
        self.renders.last()
    }

    /// Check if there are scripted steps left.
    pub fn has_pending(&self) -> bool {
        !self.script.is_empty()
    }

    /// Whether the runtime has stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    async fn poll_input(&mut self) -> Result<Option<InstrumentEvent>, Self::Error> {
        while let Some(step) = self.script.pop_front() {
            match step {
                Scripted::Advance(by) => self.now += by,
                Scripted::Input(event) => return Ok(Some(event)),
            }
        }
        Ok(None)
    }

    async fn send_frame(&mut self, frame: CanFrame) -> Result<(), Self::Error> {
        if self.fail_sends {
            return Err(SimDriverError(format!("bus rejected frame {:#05x}", frame.identifier())));
        }
        self.sent.push(frame);
        Ok(())
    }

    fn now(&self) -> Self::Instant {
        self.now
    }

    fn render(&mut self, indicators: &IndicatorVector) -> Result<(), Self::Error> {
        self.renders.push(*indicators);
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
