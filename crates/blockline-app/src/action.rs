//! Instrument side-effects.
//!
//! This module defines [`InstrumentAction`], the instructions produced by the
//! [`crate::Instrument`] for the runtime to execute, in order.

use blockline_core::IndicatorVector;
use blockline_proto::CanFrame;

/// Actions produced by the Instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentAction {
    /// Put this frame on the bus.
    Send(CanFrame),

    /// Push these indications to the lamps, buzzer and bell.
    Render(IndicatorVector),
}

impl InstrumentAction {
    /// Frame to send, if this is a send.
    pub fn as_send(&self) -> Option<&CanFrame> {
        match self {
            Self::Send(frame) => Some(frame),
            Self::Render(_) => None,
        }
    }

    /// Indications to show, if this is a render.
    pub fn as_render(&self) -> Option<&IndicatorVector> {
        match self {
            Self::Render(indicators) => Some(indicators),
            Self::Send(_) => None,
        }
    }
}
