use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use unievent_core::{EventService, EventStore, Rejection};

/// Delete an event after confirmation (skipped with `force`).
pub fn run<S: EventStore>(service: &mut EventService<S>, code: &str, force: bool) -> Result<()> {
    let event = service
        .event(code)
        .ok_or_else(|| Rejection::NotFound(code.to_string()))?;

    if !force {
        let registered = event.registered_count();
        let mut prompt = format!("Delete {event}?");
        if registered > 0 {
            prompt = format!(
                "Delete {event} and its {} {}?",
                registered,
                if registered == 1 { "registration" } else { "registrations" }
            );
        }

        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    let removed = service.delete_event(code)?;
    println!("{}", format!("  Deleted: {removed}").red());

    Ok(())
}
