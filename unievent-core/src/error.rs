//! Error types for unievent.

use thiserror::Error;

/// Errors that can occur in unievent operations.
#[derive(Error, Debug)]
pub enum UniEventError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not read workbook: {0}")]
    WorkbookRead(#[from] calamine::XlsxError),

    #[error("Could not write workbook: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for unievent operations.
pub type UniEventResult<T> = Result<T, UniEventError>;
