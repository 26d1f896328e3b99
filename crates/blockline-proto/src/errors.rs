//! Error types for frame construction and parsing.

use thiserror::Error;

/// Result alias for wire-level operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while building or parsing bus frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer ended before a complete frame or event could be read
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Minimum number of bytes required
        expected: usize,
        /// Number of bytes available
        actual: usize,
    },

    /// More data bytes than a CAN frame can carry
    #[error("data too long: {len} bytes exceeds maximum of {max}")]
    DataTooLong {
        /// Requested data length
        len: usize,
        /// Maximum data length
        max: usize,
    },

    /// CAN id does not fit in 7 bits
    #[error("invalid CAN id {0}: must be at most 127")]
    InvalidCanId(u8),

    /// Priority does not fit in 4 bits
    #[error("invalid priority {0}: must be at most 15")]
    InvalidPriority(u8),

    /// Identifier does not fit in 11 bits
    #[error("invalid identifier {0:#06x}: must be at most 0x07ff")]
    InvalidIdentifier(u16),

    /// Encoded length byte disagrees with the bytes that follow
    #[error("length mismatch: header claims {expected} data bytes, got {actual}")]
    LengthMismatch {
        /// Data length claimed by the encoding
        expected: usize,
        /// Data bytes actually present
        actual: usize,
    },

    /// Frame carries no opcode
    #[error("empty frame: no opcode")]
    EmptyFrame,

    /// Opcode is not one of the accessory on/off events
    #[error("not an accessory event: opcode {0:#04x}")]
    NotAccessory(u8),
}
