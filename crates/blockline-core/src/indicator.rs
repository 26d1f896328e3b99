//! Indicator projection.
//!
//! Operator lamps are a pure function of the two block states, recomputed
//! after every handled event and never cached. The remote side also drives the
//! shared warning and occupied lamps and the warning buzzer; the local side
//! drives only its own three lamps.

use std::fmt;

use crate::BlockState;

/// How a lamp is driven. The lamp collaborator owns blink timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lamp {
    /// Dark.
    #[default]
    Off,
    /// Steady.
    On,
    /// Flashing.
    Blink,
}

/// The three block lamps of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SideLamps {
    /// Line Normal.
    pub normal: Lamp,
    /// Line Clear.
    pub line_clear: Lamp,
    /// Train On Track.
    pub train_on_track: Lamp,
}

/// Every output of the instrument panel.
///
/// `bell` and `module` are not part of the state projection: [`project`]
/// leaves them off and the instrument overlays them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndicatorVector {
    /// Lamps for the peer's requests (our remote state).
    pub remote: SideLamps,
    /// Lamps for our own requests (our local state).
    pub local: SideLamps,
    /// Shared warning lamp.
    pub warning: Lamp,
    /// Shared block occupied lamp.
    pub occupied: Lamp,
    /// Warning buzzer.
    pub buzzer: bool,
    /// Attention bell.
    pub bell: bool,
    /// Module status lamp.
    pub module: Lamp,
}

impl fmt::Display for Lamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Blink => "blink",
        })
    }
}

impl fmt::Display for SideLamps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N:{} LC:{} TOT:{}", self.normal, self.line_clear, self.train_on_track)
    }
}

/// One line per panel, for logs and the console.
impl fmt::Display for IndicatorVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let onoff = |b: bool| if b { "on" } else { "off" };
        write!(
            f,
            "remote[{}] local[{}] warning:{} occupied:{} buzzer:{} bell:{} module:{}",
            self.remote,
            self.local,
            self.warning,
            self.occupied,
            onoff(self.buzzer),
            onoff(self.bell),
            self.module
        )
    }
}

fn side_lamps(state: BlockState) -> SideLamps {
    let (normal, line_clear, train_on_track) = match state {
        BlockState::Normal => (Lamp::On, Lamp::Off, Lamp::Off),
        BlockState::LineClear => (Lamp::Off, Lamp::On, Lamp::Off),
        BlockState::TrainOnTrack => (Lamp::Off, Lamp::Off, Lamp::On),
        BlockState::LCBlocked => (Lamp::Off, Lamp::Blink, Lamp::Off),
    };
    SideLamps { normal, line_clear, train_on_track }
}

/// Project the two block states onto the panel.
#[must_use]
pub fn project(remote: BlockState, local: BlockState) -> IndicatorVector {
    let blocked = remote == BlockState::LCBlocked;
    IndicatorVector {
        remote: side_lamps(remote),
        local: side_lamps(local),
        warning: if blocked { Lamp::On } else { Lamp::Off },
        occupied: if remote == BlockState::TrainOnTrack { Lamp::On } else { Lamp::Off },
        buzzer: blocked,
        bell: false,
        module: Lamp::Off,
    }
}
