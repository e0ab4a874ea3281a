//! Ingestion pipeline: candidate records in, create/skip decisions out.

use std::sync::Arc;

use mailcal_domain::{
    AllDayEventParams, CandidateEvent, IngestSummary, Result, TimedEventParams,
};
use tracing::info;

use crate::ports::EventStore;
use crate::reconcile::DuplicateReconciler;
use crate::reminder::reminder_for;
use crate::schedule::{resolve_window, EventTime};

/// Drives candidate records through the duplicate gate, interval shaping,
/// and the remote create, strictly in input order.
///
/// Each record ends as exactly one create or one explicit skip. The
/// create for record N completes before the duplicate check for record
/// N+1 is issued, so checks within a run see the run's own writes.
pub struct IngestPipeline {
    store: Arc<dyn EventStore>,
    reconciler: DuplicateReconciler,
}

impl IngestPipeline {
    /// Create a new pipeline over the given store and reconciler.
    pub fn new(store: Arc<dyn EventStore>, reconciler: DuplicateReconciler) -> Self {
        Self { store, reconciler }
    }

    /// Process the records one at a time and return the final tally.
    ///
    /// A malformed time string, an unusable oracle answer, or a remote
    /// failure aborts the whole run; events created before the failure
    /// remain on the calendar (re-running relies on the duplicate gate,
    /// not on rollback).
    pub async fn run(&self, records: &[CandidateEvent]) -> Result<IngestSummary> {
        let mut summary = IngestSummary::default();
        for record in records {
            if self.ingest_one(record).await? {
                summary.created += 1;
            } else {
                summary.skipped += 1;
            }
        }
        info!(created = summary.created, skipped = summary.skipped, "ingestion complete");
        Ok(summary)
    }

    /// Returns true when the record was created, false when skipped.
    async fn ingest_one(&self, record: &CandidateEvent) -> Result<bool> {
        let existing = self.store.events_on_day(record.date).await?;
        if self.reconciler.is_duplicate(record, &existing).await? {
            info!(
                date = %record.date,
                description = %record.description,
                "skipping duplicate event"
            );
            return Ok(false);
        }

        let time = EventTime::parse(&record.time)?;
        let reminder = reminder_for(time, record.is_deadline);
        let window = resolve_window(record.date, time);

        if window.is_all_day {
            self.store
                .create_all_day_event(AllDayEventParams {
                    title: record.description.clone(),
                    date: record.date,
                    description: None,
                    location: None,
                    reminder,
                })
                .await?;
        } else {
            self.store
                .create_timed_event(TimedEventParams {
                    title: record.description.clone(),
                    start: window.start,
                    end: window.end,
                    description: None,
                    location: None,
                    reminder,
                })
                .await?;
        }
        info!(date = %record.date, description = %record.description, "created event");
        Ok(true)
    }
}
