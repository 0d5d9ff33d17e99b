use anyhow::Result;
use unievent_core::{EventService, EventStore, Rejection};

use crate::render::render_details;

pub fn run<S: EventStore>(
    service: &EventService<S>,
    code: &str,
    student: Option<&str>,
) -> Result<()> {
    let event = service
        .event(code)
        .ok_or_else(|| Rejection::NotFound(code.to_string()))?;

    println!("{}", render_details(event, student));

    Ok(())
}
