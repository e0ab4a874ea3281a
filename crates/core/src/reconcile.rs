//! Duplicate reconciliation against the events already on a calendar day.

use std::sync::Arc;

use mailcal_domain::constants::DEDUP_MAX_TOKENS;
use mailcal_domain::{CandidateEvent, MailcalError, RemoteEvent, Result};
use serde::Deserialize;
use tracing::debug;

use crate::extract::strip_code_fences;
use crate::ports::Oracle;

/// Expected response shape for the duplicate judgment call.
#[derive(Debug, Deserialize)]
struct DedupVerdict {
    is_duplicate: bool,
}

/// Decides whether a candidate already exists among a day's events.
///
/// The judgment itself is delegated to the oracle; this component formats
/// the comparison payload, short-circuits the trivial case, and refuses
/// to guess when the oracle's answer is unusable.
pub struct DuplicateReconciler {
    oracle: Arc<dyn Oracle>,
}

impl DuplicateReconciler {
    /// Create a new reconciler backed by the given oracle.
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// True when the oracle judges the candidate a duplicate of any
    /// existing event on its day.
    ///
    /// An empty day is never a duplicate and never consults the oracle.
    /// The oracle's boolean is trusted verbatim; an answer that does not
    /// carry one is a `MalformedOracleResponse` error, never a default.
    pub async fn is_duplicate(
        &self,
        candidate: &CandidateEvent,
        existing: &[RemoteEvent],
    ) -> Result<bool> {
        if existing.is_empty() {
            return Ok(false);
        }
        let prompt = build_dedup_prompt(candidate, existing);
        let raw = self.oracle.complete(&prompt, DEDUP_MAX_TOKENS).await?;
        let verdict: DedupVerdict =
            serde_json::from_str(strip_code_fences(&raw)).map_err(|e| {
                MailcalError::MalformedOracleResponse(format!(
                    "expected {{\"is_duplicate\": <bool>}}: {e}"
                ))
            })?;
        debug!(
            date = %candidate.date,
            duplicate = verdict.is_duplicate,
            "duplicate judgment received"
        );
        Ok(verdict.is_duplicate)
    }
}

fn build_dedup_prompt(candidate: &CandidateEvent, existing: &[RemoteEvent]) -> String {
    let time = if candidate.time.is_empty() { "all day" } else { candidate.time.as_str() };
    let existing_lines = existing
        .iter()
        .map(|evt| format!("- Title: {}, Start: {}, End: {}", evt.title, evt.start, evt.end))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are given a new calendar event and a list of existing calendar events on the same date.\n\
         Determine whether the new event is a duplicate of any existing event.\n\
         Two events are duplicates if they refer to the same real-world event, even if the wording differs slightly.\n\
         \n\
         New event:\n\
         Date: {date}, Time: {time}, Description: {description}\n\
         \n\
         Existing events:\n\
         {existing_lines}\n\
         \n\
         Respond with ONLY a JSON object: {{\"is_duplicate\": true}} or {{\"is_duplicate\": false}}\n",
        date = candidate.date.format("%Y-%m-%d"),
        description = candidate.description,
    )
}
