//! Accessory event view of a frame.

use crate::{
    CanFrame, Opcode, Polarity,
    errors::{ProtocolError, Result},
};

/// An accessory on/off event.
///
/// For long events `node_number` is the producer's node number. For short
/// events it still travels on the wire but plays no part in matching: see
/// [`AccessoryEvent::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessoryEvent {
    /// On/off opcode
    pub opcode: Opcode,
    /// Producer node number
    pub node_number: u16,
    /// Event (or device) number
    pub event_number: u16,
}

impl AccessoryEvent {
    /// A long event produced by `node_number`.
    #[must_use]
    pub fn long(node_number: u16, event_number: u16, polarity: Polarity) -> Self {
        Self { opcode: Opcode::accessory(false, polarity), node_number, event_number }
    }

    /// A short event for device `event_number`, sent by `node_number`.
    #[must_use]
    pub fn short(node_number: u16, event_number: u16, polarity: Polarity) -> Self {
        Self { opcode: Opcode::accessory(true, polarity), node_number, event_number }
    }

    /// Parse the accessory event carried by `frame`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::EmptyFrame` if the frame has no opcode
    /// - `ProtocolError::NotAccessory` for any other opcode
    /// - `ProtocolError::FrameTooShort` if node or event number is missing
    pub fn from_frame(frame: &CanFrame) -> Result<Self> {
        let data = frame.data();
        let byte = *data.first().ok_or(ProtocolError::EmptyFrame)?;
        let opcode = Opcode::from_u8(byte).ok_or(ProtocolError::NotAccessory(byte))?;

        let expected = 1 + Opcode::PAYLOAD_LEN;
        if data.len() < expected {
            return Err(ProtocolError::FrameTooShort { expected, actual: data.len() });
        }

        Ok(Self {
            opcode,
            node_number: u16::from_be_bytes([data[1], data[2]]),
            event_number: u16::from_be_bytes([data[3], data[4]]),
        })
    }

    /// Wrap this event in a frame sent from `can_id`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidCanId` if `can_id > 127`
    pub fn to_frame(&self, can_id: u8) -> Result<CanFrame> {
        let [nn_hi, nn_lo] = self.node_number.to_be_bytes();
        let [en_hi, en_lo] = self.event_number.to_be_bytes();
        CanFrame::new(can_id, &[self.opcode.to_u8(), nn_hi, nn_lo, en_hi, en_lo])
    }

    /// Edge reported by this event.
    #[must_use]
    pub fn polarity(&self) -> Polarity {
        self.opcode.polarity()
    }

    /// Whether this is a short (device-addressed) event.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.opcode.is_short()
    }

    /// `(node number, event number)` used to match taught events.
    ///
    /// Short events match with a node number of zero.
    #[must_use]
    pub fn key(&self) -> (u16, u16) {
        if self.is_short() { (0, self.event_number) } else { (self.node_number, self.event_number) }
    }
}
