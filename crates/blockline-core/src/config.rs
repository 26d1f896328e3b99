//! Node configuration.
//!
//! Everything a block instrument node needs at start-up: its identity on the
//! bus, the events it has been taught, and the request watchdog timeout.
//! Loaded from TOML; every field has a default.
//!
//! ```toml
//! node_number = 256
//! can_id = 10
//! request_timeout_ms = 10000
//!
//! [[events]]
//! node_number = 257
//! event_number = 6
//! variable = 1
//! ```

use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, TableError},
    event::{IncomingEvent, OutgoingEvent},
    table::{MemoryEventTable, TaughtEvent},
};

/// Default time before an unacknowledged request is flagged stale.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration of one block instrument node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// This node's number, stamped on every event it sends.
    pub node_number: u16,
    /// This node's CAN id.
    pub can_id: u8,
    /// Event table capacity.
    pub max_events: u8,
    /// Stale request timeout in milliseconds. Zero disables the watchdog.
    pub request_timeout_ms: u64,
    /// Feed this node's own sends back through its event table.
    pub consume_own_events: bool,
    /// Taught events.
    pub events: Vec<TaughtEvent>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_number: 256,
            can_id: 1,
            max_events: MemoryEventTable::DEFAULT_MAX_EVENTS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            consume_own_events: false,
            events: Vec::new(),
        }
    }
}

impl NodeConfig {
    /// Create a configuration with the given identity and defaults elsewhere.
    pub fn new(node_number: u16, can_id: u8) -> Self {
        Self { node_number, can_id, ..Self::default() }
    }

    /// Parse and validate a TOML configuration.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check identity, capacity and taught events.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_number == 0 {
            return Err(ConfigError::ZeroNodeNumber);
        }
        if !(1..=99).contains(&self.can_id) {
            return Err(ConfigError::InvalidCanId(self.can_id));
        }
        if self.max_events == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.events.len() > usize::from(self.max_events) {
            return Err(ConfigError::TooManyEvents {
                count: self.events.len(),
                max: self.max_events,
            });
        }

        let mut keys = HashSet::new();
        for event in &self.events {
            if !keys.insert((event.node_number, event.event_number)) {
                return Err(TableError::Duplicate {
                    node_number: event.node_number,
                    event_number: event.event_number,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Stale request timeout. `None` when the watchdog is disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    /// Build the event table from the taught events.
    pub fn event_table(&self) -> Result<MemoryEventTable, ConfigError> {
        self.validate()?;
        let mut table = MemoryEventTable::new(self.max_events);
        for event in &self.events {
            table.teach(event.node_number, event.event_number, event.variable)?;
        }
        Ok(table)
    }

    /// Teach every event `peer_node` produces as its interlock counterpart.
    ///
    /// Pairs two instruments: our requests become the peer's remote events and
    /// the peer's acknowledgements become ours.
    pub fn teach_peer(&mut self, peer_node: u16) {
        for event in OutgoingEvent::ALL {
            self.teach(peer_node, event.event_number(), event.counterpart());
        }
    }

    /// Teach the commutator lock lever, produced as a long event.
    pub fn teach_commutator(&mut self, node_number: u16, event_number: u16) {
        self.teach(node_number, event_number, IncomingEvent::CommutatorLock);
    }

    fn teach(&mut self, node_number: u16, event_number: u16, event: IncomingEvent) {
        let taught = TaughtEvent { node_number, event_number, variable: event.variable() };
        match self
            .events
            .iter_mut()
            .find(|e| e.node_number == node_number && e.event_number == event_number)
        {
            Some(existing) => *existing = taught,
            None => self.events.push(taught),
        }
    }
}
