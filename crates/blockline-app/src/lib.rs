//! Application layer for the Blockline block instrument.
//!
//! One [`Instrument`] per node owns both interlock sides, the commutator gate,
//! the codec and the event table. It is the single dispatch entry point:
//! every switch edge, bus frame and tick goes in, and the frames to send plus
//! the indications to show come out as [`InstrumentAction`]s.
//!
//! # Components
//!
//! - [`Instrument`]: pure dispatch over the interlock core
//! - [`Driver`]: trait for platform-specific I/O
//! - [`Runtime`]: cooperative run-to-completion loop using a Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod driver;
mod event;
mod input;
mod instrument;
mod runtime;

pub use action::InstrumentAction;
pub use driver::Driver;
pub use event::InstrumentEvent;
pub use input::SwitchEdge;
pub use instrument::Instrument;
pub use runtime::Runtime;
