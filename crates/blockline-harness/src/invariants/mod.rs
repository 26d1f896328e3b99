//! Safety properties of a running instrument pair.
//!
//! Scenario tests pin down particular move sequences. The checks here are
//! the other half: rules about the block that no sequence of presses, lever
//! moves, deliveries or losses may break, run after every step of a
//! generated sequence.
//!
//! Checks never look inside an [`crate::InstrumentPair`]. They see only a
//! [`PairSnapshot`] of what the panels and machines report.
//!
//! ```ignore
//! let rules = InvariantRegistry::standard();
//! rules.check_all(&pair.snapshot())?;
//! ```

mod checks;
mod snapshot;

pub use checks::{GateFollowsLever, InterlockConvergence, RenderMatchesProjection};
pub use snapshot::{PairSnapshot, SideSnapshot};

/// Outcome of one check.
pub type InvariantResult = Result<(), Violation>;

/// A broken rule, named, with what was observed.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Check that failed.
    pub invariant: &'static str,
    /// Observed state that breaks it.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A rule about the block, judged from a snapshot alone.
pub trait Invariant: Send + Sync {
    /// Short name shown in violations.
    fn name(&self) -> &'static str;

    /// Judge `state`.
    fn check(&self, state: &PairSnapshot) -> InvariantResult;
}

/// The set of rules a pair is held to.
#[derive(Default)]
pub struct InvariantRegistry {
    rules: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// No rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every interlock rule:
    ///
    /// - [`RenderMatchesProjection`]: lamps shown equal lamps projected
    /// - [`InterlockConvergence`]: a drained, lossless bus leaves both ends
    ///   in agreement
    /// - [`GateFollowsLever`]: the gate is open exactly when the lever is off
    pub fn standard() -> Self {
        Self::new()
            .with(RenderMatchesProjection)
            .with(InterlockConvergence)
            .with(GateFollowsLever)
    }

    /// Add a rule.
    #[must_use]
    pub fn with<I: Invariant + 'static>(mut self, rule: I) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Judge `state` against every rule, collecting each one broken.
    pub fn check_all(&self, state: &PairSnapshot) -> Result<(), Vec<Violation>> {
        let broken: Vec<Violation> =
            self.rules.iter().filter_map(|rule| rule.check(state).err()).collect();
        if broken.is_empty() { Ok(()) } else { Err(broken) }
    }

    /// Like [`Self::check_all`], but a broken rule fails the calling test.
    /// `context` says which step led here.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &PairSnapshot, context: &str) {
        if let Err(broken) = self.check_all(state) {
            let lines: Vec<String> = broken.iter().map(ToString::to_string).collect();
            panic!("interlock rule broken {context}:\n  {}", lines.join("\n  "));
        }
    }

    /// Rules held.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are held.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
