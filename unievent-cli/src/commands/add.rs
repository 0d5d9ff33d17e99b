use anyhow::Result;
use owo_colors::OwoColorize;
use unievent_core::{Event, EventDetails, EventService, EventStore};

use super::EventFields;
use crate::input::{self, prompt_text, prompt_with_retry};

/// Create an event, prompting for any field not given on the command line.
pub fn run<S: EventStore>(
    service: &mut EventService<S>,
    code: Option<String>,
    fields: EventFields,
    default_header_image: &str,
) -> Result<()> {
    let code = match code {
        Some(c) => c,
        None => prompt_with_retry("  Code", |s| {
            let s = s.trim();
            if s.is_empty() {
                anyhow::bail!("Code must not be empty");
            }
            Ok(s.to_string())
        })?,
    };

    if service.event(&code).is_some() {
        anyhow::bail!("Event with code {} already exists", code);
    }

    let name = match fields.name {
        Some(n) => n,
        None => prompt_text("  Name")?,
    };
    let description = match fields.description {
        Some(d) => d,
        None => prompt_text("  Description")?,
    };
    let location = match fields.location {
        Some(l) => l,
        None => prompt_text("  Where?")?,
    };
    let date = match fields.date {
        Some(d) => d,
        None => prompt_with_retry("  Date (YYYY-MM-DD)", input::parse_date)?,
    };
    let time = match fields.time {
        Some(t) => t,
        None => prompt_with_retry("  Time (HH:MM)", input::parse_time)?,
    };
    let capacity = match fields.capacity {
        Some(c) => c,
        None => prompt_with_retry("  Capacity", input::parse_capacity)?,
    };
    let cost = match fields.cost {
        Some(c) => c,
        None => prompt_with_retry("  Cost (or \"free\")", input::parse_cost)?,
    };

    let details = EventDetails {
        name,
        description,
        location,
        header_image: fields
            .image
            .unwrap_or_else(|| default_header_image.to_string()),
        date_time: date.and_time(time),
        capacity,
        cost,
    };
    let event = Event::new(code, details)?;
    let label = event.to_string();

    service.add_event(event)?;
    println!("{}", format!("  Created: {label}").green());

    Ok(())
}
