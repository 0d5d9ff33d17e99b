use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::warn;
use unievent_core::{EventService, EventStore};

/// Record a new header image path. The image file itself is not copied.
pub fn run<S: EventStore>(service: &mut EventService<S>, code: &str, path: &str) -> Result<()> {
    if !Path::new(path).exists() {
        warn!(path, "header image does not exist yet");
    }

    service.set_header_image(code, path)?;
    println!("{}", format!("  Header image for {code}: {path}").green());

    Ok(())
}
