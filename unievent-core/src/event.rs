//! The event entity and its registration roster.
//!
//! An [`Event`] is identified by its code, which never changes after
//! construction. Everything an administrator can edit lives in
//! [`EventDetails`]; editing an event means swapping in new details while the
//! code and the roster stay put.

use chrono::NaiveDateTime;
use std::fmt;

use crate::error::{UniEventError, UniEventResult};

/// Longest student id accepted for registration, in characters.
pub const MAX_STUDENT_ID_LEN: usize = 256;

/// Whether `id` can be stored in a roster and read back unchanged.
///
/// Rosters are stored as comma-separated text, so an id must be non-empty,
/// must not contain a comma and must not start or end with whitespace.
pub fn is_valid_student_id(id: &str) -> bool {
    !id.is_empty()
        && !id.contains(',')
        && id.trim() == id
        && id.chars().count() <= MAX_STUDENT_ID_LEN
}

/// Editable, descriptive fields of an event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub name: String,
    pub description: String,
    pub location: String,
    /// Path or identifier of the header image
    pub header_image: String,
    /// Scheduled start, in local time
    pub date_time: NaiveDateTime,
    pub capacity: u32,
    /// Cost in the currency shown with a `$` prefix; `0.0` means free
    pub cost: f64,
}

/// A university event with a capacity-bounded list of registered students.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    code: String,
    details: EventDetails,
    /// Student ids in registration order
    registered: Vec<String>,
}

impl Event {
    /// Create an event with an empty roster.
    ///
    /// Fails if the code is blank or the cost is negative or not a number.
    pub fn new(code: impl Into<String>, details: EventDetails) -> UniEventResult<Self> {
        let code = code.into();

        if code.trim().is_empty() {
            return Err(UniEventError::InvalidEvent(
                "event code must not be empty".into(),
            ));
        }
        validate_cost(details.cost)?;

        Ok(Event {
            code,
            details,
            registered: Vec::new(),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn details(&self) -> &EventDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn description(&self) -> &str {
        &self.details.description
    }

    pub fn location(&self) -> &str {
        &self.details.location
    }

    pub fn header_image(&self) -> &str {
        &self.details.header_image
    }

    pub fn date_time(&self) -> NaiveDateTime {
        self.details.date_time
    }

    pub fn capacity(&self) -> u32 {
        self.details.capacity
    }

    pub fn cost(&self) -> f64 {
        self.details.cost
    }

    pub fn registered_students(&self) -> &[String] {
        &self.registered
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    pub fn is_registered(&self, student: &str) -> bool {
        self.registered.iter().any(|s| s == student)
    }

    /// Append a student if a seat is left. Returns whether the student was added.
    ///
    /// Duplicate ids are not checked here; `EventService` rejects them first.
    pub fn register_student(&mut self, student: impl Into<String>) -> bool {
        if self.is_full() {
            return false;
        }
        self.registered.push(student.into());
        true
    }

    /// Remove the first entry for `student`. Returns whether anything was removed.
    pub fn unregister_student(&mut self, student: &str) -> bool {
        match self.registered.iter().position(|s| s == student) {
            Some(index) => {
                self.registered.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.registered.len() >= self.details.capacity as usize
    }

    /// Seats left. Only negative if the roster was built past capacity,
    /// which `set_registered_students` prevents.
    pub fn available_seats(&self) -> i64 {
        i64::from(self.details.capacity) - self.registered.len() as i64
    }

    /// Replace the whole roster.
    pub fn set_registered_students(&mut self, students: Vec<String>) -> UniEventResult<()> {
        if students.len() > self.details.capacity as usize {
            return Err(UniEventError::InvalidState(format!(
                "{} registered students exceed capacity {} of event '{}'",
                students.len(),
                self.details.capacity,
                self.code
            )));
        }
        self.registered = students;
        Ok(())
    }

    /// Same event (code and roster) with new details.
    pub fn with_details(mut self, details: EventDetails) -> UniEventResult<Self> {
        validate_cost(details.cost)?;

        if self.registered.len() > details.capacity as usize {
            return Err(UniEventError::InvalidState(format!(
                "capacity {} is below the {} students already registered for '{}'",
                details.capacity,
                self.registered.len(),
                self.code
            )));
        }
        self.details = details;
        Ok(self)
    }

    pub fn set_header_image(&mut self, path: impl Into<String>) {
        self.details.header_image = path.into();
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.details.name, self.code)
    }
}

fn validate_cost(cost: f64) -> UniEventResult<()> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(UniEventError::InvalidEvent(format!(
            "cost must be a non-negative amount, got {cost}"
        )));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
