//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for mailcal
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MailcalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Event extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Malformed oracle response: {0}")]
    MalformedOracleResponse(String),

    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Remote calendar error: {0}")]
    Remote(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type alias for mailcal operations
pub type Result<T> = std::result::Result<T, MailcalError>;
