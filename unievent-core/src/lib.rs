//! Core types for unievent.
//!
//! - `Event` and `EventDetails`: an event and its registration roster
//! - `EventService`: the in-memory collection and its registration rules
//! - `EventStore`: the storage boundary, with a spreadsheet implementation in `xlsx`
//! - `UniEventConfig`: where the data lives

pub mod config;
pub mod error;
pub mod event;
pub mod service;
pub mod store;
pub mod xlsx;

pub use config::UniEventConfig;
pub use error::{UniEventError, UniEventResult};
pub use event::{Event, EventDetails};
pub use service::{EventService, Rejection};
pub use store::{EventStore, MemoryStore};
pub use xlsx::XlsxEventStore;
