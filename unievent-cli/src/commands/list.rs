use anyhow::Result;
use owo_colors::OwoColorize;
use unievent_core::{EventService, EventStore};

use crate::render::Render;

pub fn run<S: EventStore>(service: &EventService<S>) -> Result<()> {
    let events = service.events();

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for event in events {
        println!("{}", event.render());
    }

    Ok(())
}
