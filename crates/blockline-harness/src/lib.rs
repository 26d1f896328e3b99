//! Deterministic simulation harness for Blockline block instruments.
//!
//! Wires two instruments back to back over an in-memory bus, each with the
//! commutator lever that guards it, and drives them with virtual time. Frames
//! are delivered one at a time in send order, so tests control exactly what
//! each side has seen.
//!
//! # Model-Based Testing
//!
//! [`Operation`] covers everything that can happen to a pair: panel switches,
//! lever moves, frame delivery and loss, and the passage of time. Sequences
//! are generated by proptest (or by the fuzzer via `arbitrary`) and applied
//! to an [`InstrumentPair`].
//!
//! # Invariant Testing
//!
//! The `invariants` module checks what must hold after every operation.
//! Use [`InvariantRegistry::standard()`] for the interlock invariants.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod clock;
pub mod invariants;
pub mod operation;
pub mod pair;
pub mod sim_bus;
pub mod sim_driver;

pub use clock::SimInstant;
pub use invariants::{
    GateFollowsLever, Invariant, InvariantRegistry, InvariantResult, InterlockConvergence,
    PairSnapshot, RenderMatchesProjection, SideSnapshot, Violation,
};
pub use operation::{Operation, PanelSwitch, Side};
pub use pair::{InstrumentPair, standard_configs};
pub use sim_bus::{BusFrame, SimBus};
pub use sim_driver::{SimDriver, SimDriverError};
