//! Operations for model-based testing.
//!
//! Operations represent everything that can happen to an instrument pair.
//! They are generated randomly by proptest or the fuzzer and applied to an
//! [`crate::InstrumentPair`].

use arbitrary::Arbitrary;
use blockline_core::Switch;

/// One of the two instruments in a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Arbitrary)]
pub enum Side {
    /// First instrument.
    A,
    /// Second instrument.
    B,
}

impl Side {
    /// Both sides, in index order.
    pub const BOTH: [Self; 2] = [Self::A, Self::B];

    /// Array index of this side.
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// The instrument at the other end of the block.
    #[must_use]
    pub fn peer(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::A => "A",
            Self::B => "B",
        })
    }
}

/// Panel switch, mirrored so it can derive `Arbitrary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum PanelSwitch {
    /// Line Clear switch.
    LineClear,
    /// Train On Track switch.
    TrainOnTrack,
    /// Normal switch.
    Normal,
    /// Bell push.
    Bell,
}

impl From<PanelSwitch> for Switch {
    fn from(switch: PanelSwitch) -> Self {
        match switch {
            PanelSwitch::LineClear => Self::LineClear,
            PanelSwitch::TrainOnTrack => Self::TrainOnTrack,
            PanelSwitch::Normal => Self::Normal,
            PanelSwitch::Bell => Self::Bell,
        }
    }
}

/// Operations that can be applied to a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Signaller presses a panel switch.
    Press {
        /// Panel the switch is on.
        side: Side,
        /// Switch pressed.
        switch: PanelSwitch,
    },

    /// Signaller lets go of a panel switch.
    Release {
        /// Panel the switch is on.
        side: Side,
        /// Switch released.
        switch: PanelSwitch,
    },

    /// Move the commutator lever guarding one instrument.
    Lever {
        /// Instrument whose gate the lever drives.
        side: Side,
        /// `true` to lock, `false` to release.
        locked: bool,
    },

    /// Deliver the oldest frame on the bus.
    DeliverNext,

    /// Lose the oldest frame on the bus.
    DropNext,

    /// Deliver until the bus is quiet.
    Settle,

    /// Advance simulated time and tick both instruments.
    AdvanceTime {
        /// Milliseconds to advance.
        millis: u16,
    },
}
