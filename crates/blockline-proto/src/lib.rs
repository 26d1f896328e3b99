//! Wire types for the Blockline block instrument bus.
//!
//! The bus carries standard 11-bit CAN frames. Block instruments only speak
//! accessory events: a node number and an event number, switched on or off by
//! the opcode. This crate holds the frame value type, its byte encoding for
//! transports that move frames as bytes, and the accessory event view used by
//! the interlock codec.
//!
//! Nothing here knows what an event *means*. Mapping event numbers to
//! interlock events is the job of `blockline-core`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod accessory;
mod errors;
mod frame;
mod opcode;

pub use accessory::AccessoryEvent;
pub use errors::{ProtocolError, Result};
pub use frame::CanFrame;
pub use opcode::{Opcode, Polarity};
