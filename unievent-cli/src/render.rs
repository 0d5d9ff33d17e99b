//! TUI rendering for unievent types.

use owo_colors::OwoColorize;
use unievent_core::Event;
use unievent_core::xlsx::format_cost;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    /// One line for the event list.
    fn render(&self) -> String {
        let when = self.date_time().format("%a %b %-d %Y, %H:%M").to_string();

        format!(
            "{:<12} {} {} {}",
            self.code().bold(),
            self.name(),
            format!("{when} @ {}", self.location()).dimmed(),
            render_seats(self)
        )
    }
}

/// "Available: 3 / 10", colored by how full the event is.
pub fn render_seats(event: &Event) -> String {
    let label = format!("Available: {} / {}", event.available_seats(), event.capacity());

    if event.is_full() {
        label.red().to_string()
    } else if event.available_seats() * 5 <= i64::from(event.capacity()) {
        label.yellow().to_string()
    } else {
        label.green().to_string()
    }
}

/// Full detail view. `student` switches from the admin view (roster) to the
/// student view (own registration status).
pub fn render_details(event: &Event, student: Option<&str>) -> String {
    let mut lines = vec![
        format!("{} {}", event.name().bold(), format!("({})", event.code()).dimmed()),
        format!("   When:        {}", event.date_time().format("%Y-%m-%d %H:%M")),
        format!("   Where:       {}", event.location()),
        format!("   Cost:        {}", format_cost(event.cost())),
        format!("   Header:      {}", event.header_image()),
        format!("   {}", render_seats(event)),
    ];

    if !event.description().is_empty() {
        lines.push(String::new());
        lines.push(format!("   {}", event.description()));
    }

    lines.push(String::new());
    match student {
        Some(student) => lines.push(format!("   {}", render_status(event, student))),
        None => {
            lines.push(format!(
                "   Registered students ({}):",
                event.registered_count()
            ));
            if event.registered_students().is_empty() {
                lines.push(format!("      {}", "none yet".dimmed()));
            }
            for (i, s) in event.registered_students().iter().enumerate() {
                lines.push(format!("      {}. {}", i + 1, s));
            }
        }
    }

    lines.join("\n")
}

fn render_status(event: &Event, student: &str) -> String {
    if event.is_registered(student) {
        format!("{student} is registered").green().to_string()
    } else if event.is_full() {
        "Event is full".red().to_string()
    } else {
        format!("{student} is not registered").dimmed().to_string()
    }
}
