//! Shared test helpers for `mailcal-core` integration tests.
//!
//! Lightweight in-memory doubles for the two ports so pipeline tests can
//! assert on exact write traffic and oracle usage instead of boilerplate.

pub mod oracle;
pub mod store;
