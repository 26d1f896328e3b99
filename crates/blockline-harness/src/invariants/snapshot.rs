//! Observable state of an instrument pair.
//!
//! Snapshots are plain data so invariants can be checked (and unit tested)
//! without building instruments.

use blockline_core::{BlockState, IndicatorVector};

/// What one instrument shows and holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideSnapshot {
    /// Authoritative state for the peer's requests.
    pub remote: BlockState,
    /// Last acknowledged state of our own requests.
    pub local: BlockState,
    /// Commutator gate.
    pub gate_released: bool,
    /// Lever position, `None` when no lever is taught.
    pub lever_locked: Option<bool>,
    /// Bell output.
    pub bell: bool,
    /// Whether an outstanding request has gone stale.
    pub stale: bool,
    /// Indications the instrument would render now.
    pub indicators: IndicatorVector,
    /// Indications last pushed to the panel.
    pub rendered: IndicatorVector,
}

impl SideSnapshot {
    /// A powered-up instrument that has seen nothing.
    pub fn initial() -> Self {
        Self {
            remote: BlockState::Normal,
            local: BlockState::Normal,
            gate_released: true,
            lever_locked: Some(false),
            bell: false,
            stale: false,
            indicators: blockline_core::project(BlockState::Normal, BlockState::Normal),
            rendered: blockline_core::project(BlockState::Normal, BlockState::Normal),
        }
    }
}

/// Both sides plus the state of the bus between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSnapshot {
    /// Side A, then side B.
    pub sides: [SideSnapshot; 2],
    /// Nothing is in flight.
    pub quiescent: bool,
    /// No frame has ever been lost.
    pub lossless: bool,
}

impl PairSnapshot {
    /// Two fresh instruments on an idle bus.
    pub fn initial() -> Self {
        Self { sides: [SideSnapshot::initial(), SideSnapshot::initial()], quiescent: true, lossless: true }
    }

    /// Whether both sides must agree right now.
    pub fn settled(&self) -> bool {
        self.quiescent && self.lossless
    }
}
