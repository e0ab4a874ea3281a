//! # Mailcal Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Scheduling semantics (time parsing, interval shaping, reminders)
//! - The duplicate reconciler and bulletin extractor
//! - The ingestion pipeline
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `mailcal-domain`
//! - No HTTP, filesystem, or provider code
//! - All external collaborators (remote store, oracle) via traits
//! - Pure, testable business logic

pub mod extract;
pub mod ingest;
pub mod ports;
pub mod reconcile;
pub mod reminder;
pub mod schedule;

// Re-export the service surface
pub use extract::BulletinExtractor;
pub use ingest::IngestPipeline;
pub use ports::{EventStore, Oracle};
pub use reconcile::DuplicateReconciler;
pub use reminder::reminder_for;
pub use schedule::{resolve_window, EventTime, EventWindow};
