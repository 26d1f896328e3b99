//! Interlock core for the Blockline block instrument.
//!
//! Two signal boxes share one block of track. Each box runs two coupled state
//! machines: a [`RemoteInterlock`] that is authoritative for requests arriving
//! from the peer, and a [`LocalInterlock`] that caches what the peer last
//! acknowledged for requests made from this panel. A [`CommutatorGate`] can
//! veto a Line Clear grant. Operator lamps are a pure [`project`]ion of the
//! two states.
//!
//! All machines are pure: they take an event and return the events to emit.
//! No I/O, no clocks (the [`RequestWatchdog`] takes time as a parameter), so
//! the same code runs on hardware and in simulation.
//!
//! # Components
//!
//! - [`EventCodec`]: bus frame to interlock event and back
//! - [`EventTable`]: taught events, the configuration storage collaborator
//! - [`RemoteInterlock`] / [`LocalInterlock`]: the two sides
//! - [`project`]: state to lamp indications
//! - [`NodeConfig`]: node identity, taught events, timeouts

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
pub mod codec;
pub mod config;
mod error;
pub mod event;
pub mod gate;
pub mod indicator;
pub mod local;
pub mod remote;
pub mod table;
pub mod watchdog;

pub use block::BlockState;
pub use codec::EventCodec;
pub use config::NodeConfig;
pub use error::{ConfigError, TableError};
pub use event::{Emission, IncomingEvent, OutgoingEvent};
pub use gate::CommutatorGate;
pub use indicator::{IndicatorVector, Lamp, SideLamps, project};
pub use local::{LocalInterlock, Switch, armed_switch, request_advance};
pub use remote::RemoteInterlock;
pub use table::{EventTable, MemoryEventTable, TaughtEvent};
pub use watchdog::{PendingRequest, RequestWatchdog};
