mod commands;
mod input;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use unievent_core::{EventService, UniEventConfig, XlsxEventStore};

use commands::EventFields;

#[derive(Parser)]
#[command(name = "unievent")]
#[command(about = "Manage university events and student registrations")]
struct Cli {
    /// Workbook to use instead of the configured data file
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all events
    List,
    /// Show one event
    Show {
        code: String,

        /// Show the event from this student's point of view
        #[arg(short, long)]
        student: Option<String>,
    },
    /// Create an event (prompts for anything not given)
    Add {
        /// Unique event code, e.g. HALLOWEEN
        #[arg(long)]
        code: Option<String>,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Change an event's details; registrations are kept
    Edit {
        code: String,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Point an event at a new header image
    SetImage { code: String, path: String },
    /// Delete an event and its registrations
    Delete {
        code: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Register a student for an event
    Register { code: String, student: String },
    /// Remove a student's registration
    Unregister { code: String, student: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unievent=info,unievent_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = UniEventConfig::load()?;
    if let Some(data) = cli.data {
        config.data_file = data;
    }

    let store = XlsxEventStore::from_config(&config);
    let mut service = EventService::load(store);

    match cli.command {
        Commands::List => commands::list::run(&service),
        Commands::Show { code, student } => {
            commands::show::run(&service, &code, student.as_deref())
        }
        Commands::Add { code, fields } => {
            commands::add::run(&mut service, code, fields, &config.default_header_image)?;
            ensure_saved(&mut service)
        }
        Commands::Edit { code, fields } => {
            commands::edit::run(&mut service, &code, fields)?;
            ensure_saved(&mut service)
        }
        Commands::SetImage { code, path } => {
            commands::set_image::run(&mut service, &code, &path)?;
            ensure_saved(&mut service)
        }
        Commands::Delete { code, force } => {
            commands::delete::run(&mut service, &code, force)?;
            ensure_saved(&mut service)
        }
        Commands::Register { code, student } => {
            commands::register::register(&mut service, &code, &student)?;
            ensure_saved(&mut service)
        }
        Commands::Unregister { code, student } => {
            commands::register::unregister(&mut service, &code, &student)?;
            ensure_saved(&mut service)
        }
    }
}

/// Retry the write once if the mutation could not be saved, and fail loudly
/// if it still cannot.
fn ensure_saved(service: &mut EventService<XlsxEventStore>) -> Result<()> {
    if service.is_in_sync() {
        return Ok(());
    }

    let path = service.store().path().display().to_string();
    service
        .flush()
        .with_context(|| format!("Changes could not be saved to {path}"))
}
