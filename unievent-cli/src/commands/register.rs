use anyhow::Result;
use owo_colors::OwoColorize;
use unievent_core::{EventService, EventStore};

use crate::render::render_seats;

pub fn register<S: EventStore>(
    service: &mut EventService<S>,
    code: &str,
    student: &str,
) -> Result<()> {
    service.register_student(code, student)?;
    print_result(service, code, &format!("{student} registered for {code}"));
    Ok(())
}

pub fn unregister<S: EventStore>(
    service: &mut EventService<S>,
    code: &str,
    student: &str,
) -> Result<()> {
    service.unregister_student(code, student)?;
    print_result(service, code, &format!("{student} unregistered from {code}"));
    Ok(())
}

fn print_result<S: EventStore>(service: &EventService<S>, code: &str, message: &str) {
    println!("{}", format!("  {message}").green());
    if let Some(event) = service.event(code) {
        println!("  {}", render_seats(event));
    }
}
