//! Interlock invariants.

use blockline_core::{Lamp, project};

use super::{Invariant, InvariantResult, PairSnapshot, Violation};

/// Indications always follow from state.
///
/// For each side, what is on the panel equals `project(remote, local)` with
/// the bell and module lamp overlaid. Holds at all times, not only when the
/// bus is quiet.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderMatchesProjection;

impl Invariant for RenderMatchesProjection {
    fn name(&self) -> &'static str {
        "render_matches_projection"
    }

    fn check(&self, state: &PairSnapshot) -> InvariantResult {
        for (i, side) in state.sides.iter().enumerate() {
            let mut expected = project(side.remote, side.local);
            expected.bell = side.bell;
            expected.module = if side.stale { Lamp::Blink } else { Lamp::Off };

            if side.indicators != expected {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "side {i}: indicators {:?} do not follow from remote={} local={}",
                        side.indicators, side.remote, side.local
                    ),
                });
            }
            if side.rendered != side.indicators {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "side {i}: panel shows {:?} but state projects {:?}",
                        side.rendered, side.indicators
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Both ends of the block agree once the bus drains.
///
/// With nothing in flight and nothing lost, each side's local state equals
/// the peer's remote state.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterlockConvergence;

impl Invariant for InterlockConvergence {
    fn name(&self) -> &'static str {
        "interlock_convergence"
    }

    fn check(&self, state: &PairSnapshot) -> InvariantResult {
        if !state.settled() {
            return Ok(());
        }

        let [a, b] = &state.sides;
        for (name, local, peer_remote) in [("A", a.local, b.remote), ("B", b.local, a.remote)] {
            if local != peer_remote {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "side {name} believes {local} but its peer holds {peer_remote}"
                    ),
                });
            }
        }
        Ok(())
    }
}

/// The gate reflects the last lever move once the bus drains.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateFollowsLever;

impl Invariant for GateFollowsLever {
    fn name(&self) -> &'static str {
        "gate_follows_lever"
    }

    fn check(&self, state: &PairSnapshot) -> InvariantResult {
        if !state.settled() {
            return Ok(());
        }

        for (i, side) in state.sides.iter().enumerate() {
            if let Some(locked) = side.lever_locked
                && side.gate_released == locked
            {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "side {i}: lever locked={locked} but gate released={}",
                        side.gate_released
                    ),
                });
            }
        }
        Ok(())
    }
}
