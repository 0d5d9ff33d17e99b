use anyhow::Result;
use owo_colors::OwoColorize;
use unievent_core::{EventService, EventStore, Rejection};

use super::EventFields;

/// Replace the details of an existing event with whatever fields were given.
/// The code and the registered students carry over.
pub fn run<S: EventStore>(
    service: &mut EventService<S>,
    code: &str,
    fields: EventFields,
) -> Result<()> {
    let existing = service
        .event(code)
        .ok_or_else(|| Rejection::NotFound(code.to_string()))?
        .clone();

    let mut details = existing.details().clone();
    if let Some(name) = fields.name {
        details.name = name;
    }
    if let Some(description) = fields.description {
        details.description = description;
    }
    if let Some(location) = fields.location {
        details.location = location;
    }
    if let Some(date) = fields.date {
        details.date_time = date.and_time(details.date_time.time());
    }
    if let Some(time) = fields.time {
        details.date_time = details.date_time.date().and_time(time);
    }
    if let Some(capacity) = fields.capacity {
        details.capacity = capacity;
    }
    if let Some(cost) = fields.cost {
        details.cost = cost;
    }
    if let Some(image) = fields.image {
        details.header_image = image;
    }

    if details == *existing.details() {
        println!("{}", "Nothing to change".dimmed());
        return Ok(());
    }

    let updated = existing.with_details(details)?;
    let label = updated.to_string();

    service.update_event(updated)?;
    println!("{}", format!("  Updated: {label}").yellow());

    Ok(())
}
