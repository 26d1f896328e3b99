//! Commutator gate.
//!
//! A single latch driven by `commutatorLock` events. While locked, Line Clear
//! requests are refused. The gate never drives a transition by itself; the
//! remote interlock re-evaluates after every update.

/// Latch that can veto a Line Clear grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommutatorGate {
    released: bool,
}

impl Default for CommutatorGate {
    fn default() -> Self {
        Self::new()
    }
}

impl CommutatorGate {
    /// Create a released (unlocked) gate.
    pub fn new() -> Self {
        Self { released: true }
    }

    /// Lock on the asserted edge, release on the released edge.
    pub fn set_lock(&mut self, asserted: bool) {
        self.released = !asserted;
    }

    /// Whether Line Clear may be granted.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}
