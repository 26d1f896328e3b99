//! CAN frame value type and its byte encoding.
//!
//! The 11-bit standard identifier is split into a 4-bit priority (high bits)
//! and a 7-bit CAN id naming the sending node. Frames carry up to eight data
//! bytes; the first data byte is the opcode.
//!
//! Byte encoding, used by transports that move frames as bytes:
//! `[identifier: 2 bytes, big endian] [len: 1 byte] [data: len bytes]`

use bytes::BufMut;

use crate::errors::{ProtocolError, Result};

/// A standard CAN data frame.
///
/// # Invariants
///
/// - `priority <= 15`, `can_id <= 127`
/// - `len <= 8`; bytes of `data` past `len` are zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanFrame {
    priority: u8,
    can_id: u8,
    len: u8,
    data: [u8; Self::MAX_DATA],
}

impl CanFrame {
    /// Maximum data bytes in a frame.
    pub const MAX_DATA: usize = 8;

    /// Priority used for accessory events (major 2, minor 3).
    pub const DEFAULT_PRIORITY: u8 = 0x0B;

    /// Largest valid CAN id.
    pub const MAX_CAN_ID: u8 = 0x7F;

    /// Size of the identifier and length prefix in the byte encoding.
    pub const ENCODED_HEADER_LEN: usize = 3;

    /// Create a frame at the default priority.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidCanId` if `can_id > 127`
    /// - `ProtocolError::DataTooLong` if `data` exceeds eight bytes
    pub fn new(can_id: u8, data: &[u8]) -> Result<Self> {
        if can_id > Self::MAX_CAN_ID {
            return Err(ProtocolError::InvalidCanId(can_id));
        }
        if data.len() > Self::MAX_DATA {
            return Err(ProtocolError::DataTooLong { len: data.len(), max: Self::MAX_DATA });
        }

        let mut buf = [0u8; Self::MAX_DATA];
        buf[..data.len()].copy_from_slice(data);

        Ok(Self { priority: Self::DEFAULT_PRIORITY, can_id, len: data.len() as u8, data: buf })
    }

    /// Replace the priority.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidPriority` if `priority > 15`
    pub fn with_priority(mut self, priority: u8) -> Result<Self> {
        if priority > 0x0F {
            return Err(ProtocolError::InvalidPriority(priority));
        }
        self.priority = priority;
        Ok(self)
    }

    /// Build a frame from an 11-bit identifier.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidIdentifier` if `identifier > 0x7FF`
    /// - `ProtocolError::DataTooLong` if `data` exceeds eight bytes
    pub fn from_identifier(identifier: u16, data: &[u8]) -> Result<Self> {
        if identifier > 0x07FF {
            return Err(ProtocolError::InvalidIdentifier(identifier));
        }
        let can_id = (identifier & 0x7F) as u8;
        let priority = (identifier >> 7) as u8;
        Self::new(can_id, data)?.with_priority(priority)
    }

    /// 11-bit standard identifier.
    #[must_use]
    pub fn identifier(&self) -> u16 {
        (u16::from(self.priority) << 7) | u16::from(self.can_id)
    }

    /// 4-bit priority.
    #[must_use]
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// 7-bit CAN id of the sending node.
    #[must_use]
    pub fn can_id(&self) -> u8 {
        self.can_id
    }

    /// Data bytes (opcode first).
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data[..usize::from(self.len)]
    }

    /// Opcode byte. `None` for a frame with no data.
    #[must_use]
    pub fn opcode(&self) -> Option<u8> {
        self.data().first().copied()
    }

    /// Length of this frame's byte encoding.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        Self::ENCODED_HEADER_LEN + usize::from(self.len)
    }

    /// Append the byte encoding of this frame to `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u16(self.identifier());
        dst.put_u8(self.len);
        dst.put_slice(self.data());
    }

    /// Decode one frame that occupies the whole of `bytes`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::FrameTooShort` if the prefix is incomplete
    /// - `ProtocolError::InvalidIdentifier` if the identifier exceeds 11 bits
    /// - `ProtocolError::DataTooLong` if the length byte exceeds eight
    /// - `ProtocolError::LengthMismatch` if the data does not match the
    ///   length byte exactly
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::ENCODED_HEADER_LEN {
            return Err(ProtocolError::FrameTooShort {
                expected: Self::ENCODED_HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let identifier = u16::from_be_bytes([bytes[0], bytes[1]]);
        let len = usize::from(bytes[2]);
        if len > Self::MAX_DATA {
            return Err(ProtocolError::DataTooLong { len, max: Self::MAX_DATA });
        }

        let data = &bytes[Self::ENCODED_HEADER_LEN..];
        if data.len() != len {
            return Err(ProtocolError::LengthMismatch { expected: len, actual: data.len() });
        }

        Self::from_identifier(identifier, data)
    }
}
