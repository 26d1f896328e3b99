//! Console node for the Blockline block instrument.
//!
//! Loads two node configurations, wires the instruments they describe back
//! to back over the simulation bus, and lets an operator work the local
//! panel (and the far one) from typed commands. Every indication change is
//! logged.
//!
//! # Architecture
//!
//! ```text
//! stdin ──► Command ──► Console ──► InstrumentPair ──► tracing
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod console;
mod error;

pub use config::{load_config, pair_configs};
pub use console::{Command, Console, Flow};
pub use error::{CommandError, NodeError};
