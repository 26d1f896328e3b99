//! Shared block state enumeration.

use std::fmt;

/// State of the block as seen by one side of the interlock.
///
/// Both sides start in [`BlockState::Normal`] and cycle indefinitely; no
/// state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockState {
    /// Block free, no authority outstanding.
    #[default]
    Normal,
    /// Authority granted, train not yet in the block.
    LineClear,
    /// Train occupying the block.
    TrainOnTrack,
    /// Line Clear refused because the commutator gate was locked.
    LCBlocked,
}

impl BlockState {
    /// All states, in cycle order.
    pub const ALL: [Self; 4] = [Self::Normal, Self::LineClear, Self::TrainOnTrack, Self::LCBlocked];
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::LineClear => "line clear",
            Self::TrainOnTrack => "train on track",
            Self::LCBlocked => "line clear blocked",
        };
        f.write_str(name)
    }
}
