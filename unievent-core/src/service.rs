//! In-memory authority over the event collection.
//!
//! `EventService` loads the collection once, applies every mutation to its own
//! `Vec<Event>`, and rewrites the whole store after each successful mutation.
//! Load failures start it with an empty collection. Save failures are logged
//! and the mutation is kept; [`EventService::is_in_sync`] reports whether the
//! last write made it to storage and [`EventService::flush`] retries it.
//!
//! The service assumes it is the only writer of its store. Two processes
//! sharing one data file will overwrite each other's changes.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::UniEventResult;
use crate::event::{Event, is_valid_student_id};
use crate::store::EventStore;

/// Why a service operation was refused. The collection is unchanged when one
/// of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Event with code {0} already exists")]
    DuplicateCode(String),

    #[error("No event with code {0}")]
    NotFound(String),

    #[error("{student} is already registered for {code}")]
    AlreadyRegistered { code: String, student: String },

    #[error("{student} is not registered for {code}")]
    NotRegistered { code: String, student: String },

    #[error("Event {0} is full")]
    Full(String),

    #[error("'{0}' is not a valid student id")]
    InvalidStudentId(String),
}

pub struct EventService<S: EventStore> {
    store: S,
    events: Vec<Event>,
    in_sync: bool,
}

impl<S: EventStore> EventService<S> {
    /// Load the collection from `store`, starting empty if it cannot be read.
    pub fn load(store: S) -> Self {
        let events = match store.read_all() {
            Ok(events) => {
                info!(count = events.len(), "loaded events");
                events
            }
            Err(e) => {
                warn!(error = %e, "could not read events, starting with an empty collection");
                Vec::new()
            }
        };

        EventService {
            store,
            events,
            in_sync: true,
        }
    }

    /// All events, in stored order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, code: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.code() == code)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the last write of the collection succeeded.
    pub fn is_in_sync(&self) -> bool {
        self.in_sync
    }

    /// Write the collection now, returning the store's error if it fails.
    pub fn flush(&mut self) -> UniEventResult<()> {
        self.store.write_all(&self.events)?;
        self.in_sync = true;
        Ok(())
    }

    pub fn add_event(&mut self, event: Event) -> Result<(), Rejection> {
        if self.position(event.code()).is_some() {
            return Err(Rejection::DuplicateCode(event.code().to_string()));
        }
        check_roster(&event)?;

        debug!(code = event.code(), "adding event");
        self.events.push(event);
        self.persist();
        Ok(())
    }

    /// Replace the stored event that has the same code, keeping its position.
    pub fn update_event(&mut self, event: Event) -> Result<(), Rejection> {
        let index = self.require(event.code())?;
        check_roster(&event)?;

        debug!(code = event.code(), "updating event");
        self.events[index] = event;
        self.persist();
        Ok(())
    }

    /// Remove an event, returning it.
    pub fn delete_event(&mut self, code: &str) -> Result<Event, Rejection> {
        let index = self.require(code)?;

        debug!(code, "deleting event");
        let removed = self.events.remove(index);
        self.persist();
        Ok(removed)
    }

    /// Add `student` to the roster of event `code`.
    ///
    /// Ids that could not be stored and read back unchanged are refused, see
    /// [`is_valid_student_id`].
    pub fn register_student(&mut self, code: &str, student: &str) -> Result<(), Rejection> {
        let index = self.require(code)?;
        if !is_valid_student_id(student) {
            return Err(Rejection::InvalidStudentId(student.to_string()));
        }
        let event = &mut self.events[index];

        if event.is_registered(student) {
            return Err(Rejection::AlreadyRegistered {
                code: code.to_string(),
                student: student.to_string(),
            });
        }
        if !event.register_student(student) {
            return Err(Rejection::Full(code.to_string()));
        }

        debug!(code, student, "registered student");
        self.persist();
        Ok(())
    }

    pub fn unregister_student(&mut self, code: &str, student: &str) -> Result<(), Rejection> {
        let index = self.require(code)?;
        let event = &mut self.events[index];

        if !event.unregister_student(student) {
            return Err(Rejection::NotRegistered {
                code: code.to_string(),
                student: student.to_string(),
            });
        }

        debug!(code, student, "unregistered student");
        self.persist();
        Ok(())
    }

    /// Point an event at a new header image. Only the image field changes.
    pub fn set_header_image(&mut self, code: &str, path: &str) -> Result<(), Rejection> {
        let index = self.require(code)?;

        debug!(code, path, "setting header image");
        self.events[index].set_header_image(path);
        self.persist();
        Ok(())
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.events.iter().position(|e| e.code() == code)
    }

    fn require(&self, code: &str) -> Result<usize, Rejection> {
        self.position(code)
            .ok_or_else(|| Rejection::NotFound(code.to_string()))
    }

    fn persist(&mut self) {
        match self.store.write_all(&self.events) {
            Ok(()) => self.in_sync = true,
            Err(e) => {
                warn!(error = %e, "could not save events, keeping changes in memory only");
                self.in_sync = false;
            }
        }
    }
}

fn check_roster(event: &Event) -> Result<(), Rejection> {
    match event
        .registered_students()
        .iter()
        .find(|s| !is_valid_student_id(s))
    {
        Some(student) => Err(Rejection::InvalidStudentId(student.clone())),
        None => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================
