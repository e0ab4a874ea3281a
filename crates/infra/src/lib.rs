//! # Mailcal Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Google Calendar client and OAuth token handling
//! - LLM oracle backends (Anthropic, OpenAI)
//! - Email (`.eml`) parsing and CSV interchange
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `mailcal-core`
//! - Depends on `mailcal-domain` and `mailcal-core`
//! - Contains all "impure" code (I/O, HTTP, filesystem)

pub mod config;
pub mod errors;
pub mod google;
pub mod mail;
pub mod oracle;
pub mod tabular;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use google::*;
pub use mail::*;
pub use oracle::*;
pub use tabular::*;
