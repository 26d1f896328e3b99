//! Instrument input events.
//!
//! Inputs come from two places: the operator panel (switch edges) and the bus
//! (frames). Ticks carry time forward for the request watchdog.

use blockline_proto::CanFrame;

use crate::SwitchEdge;

/// Events processed by the Instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentEvent {
    /// Debounced panel switch edge.
    Switch(SwitchEdge),

    /// Frame received from the bus.
    Frame(CanFrame),

    /// Periodic tick.
    Tick,
}
