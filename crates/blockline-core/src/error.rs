//! Error types for configuration and the event table.
//!
//! The interlock machines themselves are total and have no error channel.
//! Errors only arise at the edges: teaching events and loading a node
//! configuration.

use thiserror::Error;

/// Errors from the taught event table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Every slot is already taught
    #[error("event table full: {max} events already taught")]
    Full {
        /// Table capacity
        max: u8,
    },

    /// Teaching would bind one key twice
    #[error("event ({node_number}, {event_number}) taught twice")]
    Duplicate {
        /// Producer node number (0 for short events)
        node_number: u16,
        /// Event number
        event_number: u16,
    },
}

/// Errors from loading or validating a node configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Node number zero is reserved for short events
    #[error("node number must be non-zero")]
    ZeroNodeNumber,

    /// CAN id outside the assignable range
    #[error("CAN id {0} out of range 1..=99")]
    InvalidCanId(u8),

    /// Table capacity of zero
    #[error("max_events must be at least 1")]
    ZeroCapacity,

    /// Taught events do not fit the table
    #[error("{count} taught events exceed table capacity {max}")]
    TooManyEvents {
        /// Events listed
        count: usize,
        /// Table capacity
        max: u8,
    },

    /// Event table rejected a taught event
    #[error("event table: {0}")]
    Table(#[from] TableError),

    /// Configuration file is not valid TOML for [`crate::NodeConfig`]
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
