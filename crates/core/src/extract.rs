//! Event extraction from bulletin text via the generative oracle.

use std::sync::Arc;

use mailcal_domain::constants::EXTRACTION_MAX_TOKENS;
use mailcal_domain::{CandidateEvent, MailcalError, Result};
use tracing::{debug, info};

use crate::ports::Oracle;

/// Instruction template for the extraction call. The oracle must answer
/// with a bare JSON array of candidate records and nothing else.
const EXTRACTION_PROMPT: &str = r#"You are given the plain-text body of a school bulletin email.
Extract every event that has a date and/or time mentioned.

Rules:
- Infer the year from context (the bulletin date in the subject or body tells you the year).
- If a date range is given (e.g. "Feb 16-20"), expand it into one row per day.
- Return ONLY a JSON array of objects. No other text.
- Each object must have exactly these keys:
  - "date": string in YYYY-MM-DD format
  - "time": string in HH:MM or HH:MM-HH:MM (24-hour) format, or "" if no specific time
  - "description": short description of the event
  - "is_deadline": boolean, set to true if the event is a deadline, due date, registration closing, or similar time-sensitive cutoff; false otherwise

Example output:
[
  {"date": "2026-02-10", "time": "12:00-13:00", "description": "ParentEd Talks", "is_deadline": false},
  {"date": "2026-02-12", "time": "", "description": "Auction Donations Due", "is_deadline": true}
]

Here is the email text:

"#;

/// Turns one email body into an ordered list of candidate events.
pub struct BulletinExtractor {
    oracle: Arc<dyn Oracle>,
}

impl BulletinExtractor {
    /// Create a new extractor backed by the given oracle.
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Extract candidate events from the email text.
    ///
    /// Records come back in oracle emission order; nothing re-sorts them.
    /// An unparsable response is a fatal `ExtractionFailed` with no
    /// partial salvage.
    pub async fn extract(&self, email_text: &str) -> Result<Vec<CandidateEvent>> {
        let prompt = format!("{EXTRACTION_PROMPT}{email_text}");
        debug!(chars = email_text.len(), "requesting event extraction");
        let raw = self.oracle.complete(&prompt, EXTRACTION_MAX_TOKENS).await?;
        let events: Vec<CandidateEvent> = serde_json::from_str(strip_code_fences(&raw))
            .map_err(|e| {
                MailcalError::ExtractionFailed(format!("expected a JSON array of events: {e}"))
            })?;
        info!(count = events.len(), "extracted candidate events");
        Ok(events)
    }
}

/// Strip an optional markdown code fence wrapping an oracle response.
///
/// Drops the opening fence line (with any language tag) and everything
/// from the final closing fence on; unfenced input passes through
/// untouched.
pub(crate) fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, tail)| tail);
    let body = body.rsplit_once("```").map_or(body, |(head, _)| head);
    body.trim()
}
