//! Taught event table.
//!
//! The configuration storage collaborator. Each slot binds one received event
//! key `(node number, event number)` to a single event variable. The transport
//! finds the slot index of a received event; the codec asks for the variable
//! bound to that index.

use blockline_proto::AccessoryEvent;
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Lookup interface the codec needs from configuration storage.
pub trait EventTable {
    /// Slot index of the taught event matching `event`. `None` if not taught.
    fn find(&self, event: &AccessoryEvent) -> Option<u8>;

    /// Event variable bound to slot `index`. `None` if the slot is empty.
    fn event_variable(&self, index: u8) -> Option<u8>;
}

/// One taught event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaughtEvent {
    /// Producer node number, 0 for short events.
    pub node_number: u16,
    /// Event number.
    pub event_number: u16,
    /// Event variable (an `IncomingEvent` value when below 10).
    pub variable: u8,
}

impl TaughtEvent {
    fn key(&self) -> (u16, u16) {
        (self.node_number, self.event_number)
    }
}

/// In-memory event table with a fixed number of slots.
///
/// Slot indices are stable: unlearning frees a slot without moving others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEventTable {
    max: u8,
    slots: Vec<Option<TaughtEvent>>,
}

impl MemoryEventTable {
    /// Default capacity.
    pub const DEFAULT_MAX_EVENTS: u8 = 32;

    /// Create an empty table holding at most `max` events.
    pub fn new(max: u8) -> Self {
        Self { max, slots: Vec::new() }
    }

    /// Teach (or re-teach) an event and return its slot index.
    ///
    /// Re-teaching an existing key replaces its variable in place.
    ///
    /// # Errors
    ///
    /// - `TableError::Full` if the key is new and no slot is free
    pub fn teach(
        &mut self,
        node_number: u16,
        event_number: u16,
        variable: u8,
    ) -> Result<u8, TableError> {
        let taught = TaughtEvent { node_number, event_number, variable };

        if let Some(index) = self.index_of((node_number, event_number)) {
            self.slots[usize::from(index)] = Some(taught);
            return Ok(index);
        }

        if let Some(free) = self.slots.iter().position(Option::is_none) {
            self.slots[free] = Some(taught);
            return Ok(free as u8);
        }

        if self.slots.len() >= usize::from(self.max) {
            return Err(TableError::Full { max: self.max });
        }

        self.slots.push(Some(taught));
        Ok((self.slots.len() - 1) as u8)
    }

    /// Forget an event. Returns whether it was taught.
    pub fn unlearn(&mut self, node_number: u16, event_number: u16) -> bool {
        match self.index_of((node_number, event_number)) {
            Some(index) => {
                self.slots[usize::from(index)] = None;
                true
            },
            None => false,
        }
    }

    /// Number of taught events.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Whether nothing is taught.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity.
    pub fn max_events(&self) -> u8 {
        self.max
    }

    /// Taught events with their slot indices.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &TaughtEvent)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| slot.as_ref().map(|e| (i as u8, e)))
    }

    fn index_of(&self, key: (u16, u16)) -> Option<u8> {
        self.iter().find(|(_, e)| e.key() == key).map(|(i, _)| i)
    }
}

impl Default for MemoryEventTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_EVENTS)
    }
}

impl EventTable for MemoryEventTable {
    fn find(&self, event: &AccessoryEvent) -> Option<u8> {
        self.index_of(event.key())
    }

    fn event_variable(&self, index: u8) -> Option<u8> {
        self.slots.get(usize::from(index)).copied().flatten().map(|e| e.variable)
    }
}

#[cfg(test)]
mod tests {
    use blockline_proto::Polarity;

    use super::*;

    #[test]
    fn teach_then_find() {
        let mut table = MemoryEventTable::default();
        let index = table.teach(200, 6, 1).unwrap();

        let event = AccessoryEvent::long(200, 6, Polarity::Asserted);
        assert_eq!(table.find(&event), Some(index));
        assert_eq!(table.event_variable(index), Some(1));

        // Off events share the key of their on event
        let off = AccessoryEvent::long(200, 6, Polarity::Released);
        assert_eq!(table.find(&off), Some(index));
    }

    #[test]
    fn short_events_match_node_zero() {
        let mut table = MemoryEventTable::default();
        let index = table.teach(0, 40, 0).unwrap();

        let event = AccessoryEvent::short(999, 40, Polarity::Asserted);
        assert_eq!(table.find(&event), Some(index));
        assert_eq!(table.find(&AccessoryEvent::long(999, 40, Polarity::Asserted)), None);
    }

    #[test]
    fn reteach_replaces_variable_in_place() {
        let mut table = MemoryEventTable::default();
        let first = table.teach(1, 1, 3).unwrap();
        let second = table.teach(1, 1, 4).unwrap();

        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
        assert_eq!(table.event_variable(first), Some(4));
    }

    #[test]
    fn full_table_rejects_new_keys_but_accepts_updates() {
        let mut table = MemoryEventTable::new(2);
        table.teach(1, 1, 0).unwrap();
        table.teach(1, 2, 0).unwrap();

        assert_eq!(table.teach(1, 3, 0), Err(TableError::Full { max: 2 }));
        assert!(table.teach(1, 2, 5).is_ok());
    }

    #[test]
    fn unlearn_frees_slot_without_moving_others() {
        let mut table = MemoryEventTable::new(3);
        let a = table.teach(1, 1, 0).unwrap();
        let b = table.teach(1, 2, 1).unwrap();

        assert!(table.unlearn(1, 1));
        assert!(!table.unlearn(1, 1));
        assert_eq!(table.event_variable(a), None);
        assert_eq!(table.event_variable(b), Some(1));

        // Freed slot is reused
        assert_eq!(table.teach(1, 3, 2).unwrap(), a);
    }

    #[test]
    fn out_of_range_index_has_no_variable() {
        let table = MemoryEventTable::default();
        assert_eq!(table.event_variable(0), None);
        assert_eq!(table.event_variable(u8::MAX), None);
    }
}
