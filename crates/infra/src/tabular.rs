//! CSV interchange for candidate events.
//!
//! Four columns: `date`, `time`, `description`, `is_deadline`. The
//! boolean column uses the literal strings `True`/`False` so files are
//! interchangeable with spreadsheet exports; anything else is rejected.

use std::path::Path;

use chrono::NaiveDate;
use mailcal_domain::{CandidateEvent, MailcalError, Result};
use serde::Deserialize;
use tracing::debug;

use crate::errors::InfraError;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    time: String,
    description: String,
    is_deadline: String,
}

impl CsvRecord {
    fn into_candidate(self, line: usize) -> Result<CandidateEvent> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|e| {
            MailcalError::InvalidInput(format!("line {line}: invalid date '{}': {e}", self.date))
        })?;

        let is_deadline = match self.is_deadline.as_str() {
            "True" => true,
            "False" => false,
            other => {
                return Err(MailcalError::InvalidInput(format!(
                    "line {line}: invalid is_deadline '{other}' (expected True or False)"
                )))
            }
        };

        Ok(CandidateEvent { date, time: self.time, description: self.description, is_deadline })
    }
}

/// Write candidate events to a CSV file, header row included even when
/// the set is empty.
///
/// # Errors
/// Returns `MailcalError::Io` when the file cannot be written.
pub fn write_candidates(path: &Path, records: &[CandidateEvent]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(InfraError::from)?;
    writer
        .write_record(["date", "time", "description", "is_deadline"])
        .map_err(InfraError::from)?;

    for record in records {
        writer
            .write_record([
                record.date.to_string(),
                record.time.clone(),
                record.description.clone(),
                bool_label(record.is_deadline).to_string(),
            ])
            .map_err(InfraError::from)?;
    }

    writer.flush().map_err(InfraError::from)?;
    debug!(path = %path.display(), count = records.len(), "Wrote candidate CSV");
    Ok(())
}

/// Read candidate events from a CSV file, preserving row order.
///
/// # Errors
/// Returns `MailcalError::Io` when the file cannot be read and
/// `MailcalError::InvalidInput` for malformed rows.
pub fn read_candidates(path: &Path) -> Result<Vec<CandidateEvent>> {
    let mut reader = csv::Reader::from_path(path).map_err(InfraError::from)?;

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<CsvRecord>().enumerate() {
        let raw = result.map_err(InfraError::from)?;
        // Header occupies line 1; the first record is line 2
        records.push(raw.into_candidate(row + 2)?);
    }

    debug!(path = %path.display(), count = records.len(), "Read candidate CSV");
    Ok(records)
}

fn bool_label(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
