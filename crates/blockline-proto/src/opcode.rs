//! Accessory event opcodes and their polarity.
//!
//! Accessory events come in on/off pairs. Long events are addressed by the
//! producer's node number plus an event number; short events by the event
//! (device) number alone.

use std::fmt;

/// Which edge of a condition an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Condition became true (bus "on").
    Asserted,
    /// Condition became false (bus "off").
    Released,
}

impl Polarity {
    /// `Asserted` for `true`, `Released` for `false`.
    #[must_use]
    pub fn from_bool(asserted: bool) -> Self {
        if asserted { Self::Asserted } else { Self::Released }
    }

    /// Whether this is the asserted edge.
    #[must_use]
    pub fn is_asserted(self) -> bool {
        self == Self::Asserted
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asserted => f.write_str("on"),
            Self::Released => f.write_str("off"),
        }
    }
}

/// Accessory event opcode.
///
/// The top three bits of every opcode encode how many data bytes follow it.
/// All four accessory opcodes carry four: node number then event number, both
/// big endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Long accessory on
    Acon = 0x90,
    /// Long accessory off
    Acof = 0x91,
    /// Short accessory on
    Ason = 0x98,
    /// Short accessory off
    Asof = 0x99,
}

impl Opcode {
    /// Data bytes following an accessory opcode.
    pub const PAYLOAD_LEN: usize = 4;

    /// Parse a raw opcode byte. `None` if it is not an accessory on/off event.
    #[must_use]
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x90 => Some(Self::Acon),
            0x91 => Some(Self::Acof),
            0x98 => Some(Self::Ason),
            0x99 => Some(Self::Asof),
            _ => None,
        }
    }

    /// Raw opcode byte.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Opcode for an event of the given addressing mode and polarity.
    #[must_use]
    pub fn accessory(short: bool, polarity: Polarity) -> Self {
        match (short, polarity) {
            (false, Polarity::Asserted) => Self::Acon,
            (false, Polarity::Released) => Self::Acof,
            (true, Polarity::Asserted) => Self::Ason,
            (true, Polarity::Released) => Self::Asof,
        }
    }

    /// On opcodes assert, off opcodes release.
    #[must_use]
    pub fn polarity(self) -> Polarity {
        match self {
            Self::Acon | Self::Ason => Polarity::Asserted,
            Self::Acof | Self::Asof => Polarity::Released,
        }
    }

    /// Short events are matched on event number only.
    #[must_use]
    pub fn is_short(self) -> bool {
        matches!(self, Self::Ason | Self::Asof)
    }

    /// Number of data bytes that follow an opcode byte, from its top three
    /// bits.
    #[must_use]
    pub fn payload_len_of(byte: u8) -> usize {
        usize::from(byte >> 5)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Acon => "ACON",
            Self::Acof => "ACOF",
            Self::Ason => "ASON",
            Self::Asof => "ASOF",
        };
        f.write_str(name)
    }
}
