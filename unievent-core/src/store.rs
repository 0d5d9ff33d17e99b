//! Storage boundary for the event collection.

use std::cell::RefCell;

use crate::error::UniEventResult;
use crate::event::Event;

/// Durable storage for the full event collection.
///
/// Stores always move the whole collection: `write_all` replaces whatever was
/// stored before and `read_all` returns events in stored order.
pub trait EventStore {
    fn read_all(&self) -> UniEventResult<Vec<Event>>;

    fn write_all(&self, events: &[Event]) -> UniEventResult<()>;
}

/// A store that keeps the collection in memory. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RefCell<Vec<Event>>,
}

impl MemoryStore {
    pub fn new(events: Vec<Event>) -> Self {
        MemoryStore {
            events: RefCell::new(events),
        }
    }

    /// What a `read_all` would return right now.
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }
}

impl EventStore for MemoryStore {
    fn read_all(&self) -> UniEventResult<Vec<Event>> {
        Ok(self.snapshot())
    }

    fn write_all(&self, events: &[Event]) -> UniEventResult<()> {
        *self.events.borrow_mut() = events.to_vec();
        Ok(())
    }
}

impl<S: EventStore + ?Sized> EventStore for &S {
    fn read_all(&self) -> UniEventResult<Vec<Event>> {
        (**self).read_all()
    }

    fn write_all(&self, events: &[Event]) -> UniEventResult<()> {
        (**self).write_all(events)
    }
}
