//! Event codec: bus frames to interlock events and back.
//!
//! Decoding goes through the event table: the index of a learned event
//! selects one event variable, and that variable names the
//! [`IncomingEvent`]. Anything that does not decode cleanly is dropped
//! without an error; unknown events are not faults.

use blockline_proto::{AccessoryEvent, CanFrame, Polarity, ProtocolError};

use crate::{
    event::{Emission, IncomingEvent},
    table::EventTable,
};

/// Encodes this node's sends and decodes learned events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCodec {
    node_number: u16,
    can_id: u8,
}

impl EventCodec {
    /// Create a codec sending as `node_number` from `can_id`.
    ///
    /// `can_id` above 127 is masked to 7 bits; configurations are validated
    /// to 1..=99 before reaching here.
    pub fn new(node_number: u16, can_id: u8) -> Self {
        Self { node_number, can_id: can_id & CanFrame::MAX_CAN_ID }
    }

    /// Node number stamped on sends.
    #[must_use]
    pub fn node_number(&self) -> u16 {
        self.node_number
    }

    /// CAN id stamped on sends.
    #[must_use]
    pub fn can_id(&self) -> u8 {
        self.can_id
    }

    /// Decode a learned event.
    ///
    /// Returns `None` when the slot is empty, the taught variable is not a
    /// valid [`IncomingEvent`], or the frame is not an accessory event.
    pub fn decode_learned<T>(
        table: &T,
        index: u8,
        frame: &CanFrame,
    ) -> Option<(IncomingEvent, Polarity)>
    where
        T: EventTable + ?Sized,
    {
        let accessory = match AccessoryEvent::from_frame(frame) {
            Ok(accessory) => accessory,
            Err(e) => {
                tracing::trace!(index, error = %e, "codec: not an accessory event");
                return None;
            },
        };

        let Some(variable) = table.event_variable(index) else {
            tracing::trace!(index, "codec: no event taught at index");
            return None;
        };

        let Some(event) = IncomingEvent::from_variable(variable) else {
            tracing::trace!(index, variable, "codec: event variable out of range");
            return None;
        };

        Some((event, accessory.polarity()))
    }

    /// Frame for one of this node's sends: a long event numbered by the
    /// event's ordinal, on or off by polarity.
    ///
    /// # Errors
    ///
    /// - `ProtocolError` if the frame cannot be built for this node's CAN id
    pub fn encode(&self, emission: Emission) -> Result<CanFrame, ProtocolError> {
        let event =
            AccessoryEvent::long(self.node_number, emission.event.event_number(), emission.polarity);
        event.to_frame(self.can_id)
    }
}
