//! Google Calendar integration
//!
//! OAuth2 installed-app credential handling plus the Calendar v3 REST
//! client backing the `EventStore` port.

pub mod auth;
pub mod client;
pub(crate) mod types;

pub use auth::{GoogleAuth, GoogleToken};
pub use client::GoogleCalendarStore;
