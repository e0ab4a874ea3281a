//! Email bulletin input.
//!
//! Reads `.eml` files and reduces them to plain text for extraction.
//! HTML bodies are preferred because school bulletins usually carry the
//! real content there; the plain-text part is the fallback.

use std::path::Path;

use mailcal_domain::{MailcalError, Result};
use mailparse::ParsedMail;
use tracing::debug;

use crate::errors::InfraError;

const RENDER_WIDTH: usize = 80;

/// Read an `.eml` file and return its body as plain text.
///
/// Prefers the first `text/html` part (converted to text), falls back to
/// the first `text/plain` part, and returns an empty string when neither
/// exists. Charset decoding follows each part's declared charset with a
/// lossy fallback.
///
/// # Errors
/// Returns `MailcalError::Io` if the file cannot be read and
/// `MailcalError::InvalidInput` if the message cannot be parsed.
pub fn read_eml(path: &Path) -> Result<String> {
    let raw = std::fs::read(path).map_err(InfraError::from)?;
    let text = message_text(&raw)?;
    debug!(path = %path.display(), chars = text.len(), "Read bulletin email");
    Ok(text)
}

/// Reduce a raw RFC 5322 message to plain text.
pub fn message_text(raw: &[u8]) -> Result<String> {
    let parsed = mailparse::parse_mail(raw).map_err(InfraError::from)?;

    if let Some(html) = find_part(&parsed, "text/html") {
        let text = html2text::from_read(html.as_bytes(), RENDER_WIDTH)
            .map_err(|e| MailcalError::InvalidInput(format!("failed to convert HTML part: {e}")))?;
        return Ok(text);
    }

    if let Some(plain) = find_part(&parsed, "text/plain") {
        return Ok(plain);
    }

    Ok(String::new())
}

/// Depth-first search for the first part with the given mimetype whose
/// body decodes.
fn find_part(part: &ParsedMail<'_>, mimetype: &str) -> Option<String> {
    if part.ctype.mimetype.eq_ignore_ascii_case(mimetype) {
        return part.get_body().ok();
    }
    part.subparts.iter().find_map(|sub| find_part(sub, mimetype))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_body() {
        let eml = concat!(
            "From: office@school.example\r\n",
            "Subject: Weekly Bulletin\r\n",
            "Content-Type: text/plain; charset=\"utf-8\"\r\n",
            "\r\n",
            "ParentEd Talks on Feb 10 at noon.\r\n",
        );

        let text = message_text(eml.as_bytes()).unwrap();
        assert!(text.contains("ParentEd Talks on Feb 10 at noon."));
    }

    #[test]
    fn test_html_preferred_over_plain() {
        let eml = concat!(
            "From: office@school.example\r\n",
            "Subject: Weekly Bulletin\r\n",
            "MIME-Version: 1.0\r\n",
            "Content-Type: multipart/alternative; boundary=\"BOUND\"\r\n",
            "\r\n",
            "--BOUND\r\n",
            "Content-Type: text/plain; charset=\"utf-8\"\r\n",
            "\r\n",
            "Plain version\r\n",
            "--BOUND\r\n",
            "Content-Type: text/html; charset=\"utf-8\"\r\n",
            "\r\n",
            "<html><body><p>Rich version with <b>details</b></p></body></html>\r\n",
            "--BOUND--\r\n",
        );

        let text = message_text(eml.as_bytes()).unwrap();
        assert!(text.contains("Rich version with"));
        assert!(!text.contains("Plain version"));
    }

    #[test]
    fn test_html_tags_are_stripped() {
        let eml = concat!(
            "Content-Type: text/html; charset=\"utf-8\"\r\n",
            "\r\n",
            "<html><body><h1>Bulletin</h1><p>No school Monday.</p></body></html>\r\n",
        );

        let text = message_text(eml.as_bytes()).unwrap();
        assert!(text.contains("Bulletin"));
        assert!(text.contains("No school Monday."));
        assert!(!text.contains("<p>"));
        assert!(!text.contains("<h1>"));
    }

    #[test]
    fn test_quoted_printable_decoded() {
        let eml = concat!(
            "Content-Type: text/plain; charset=\"utf-8\"\r\n",
            "Content-Transfer-Encoding: quoted-printable\r\n",
            "\r\n",
            "Caf=C3=A9 night fundraiser\r\n",
        );

        let text = message_text(eml.as_bytes()).unwrap();
        assert!(text.contains("Café night fundraiser"));
    }

    #[test]
    fn test_nested_multipart_found() {
        let eml = concat!(
            "MIME-Version: 1.0\r\n",
            "Content-Type: multipart/mixed; boundary=\"OUTER\"\r\n",
            "\r\n",
            "--OUTER\r\n",
            "Content-Type: multipart/alternative; boundary=\"INNER\"\r\n",
            "\r\n",
            "--INNER\r\n",
            "Content-Type: text/plain; charset=\"utf-8\"\r\n",
            "\r\n",
            "Nested plain body\r\n",
            "--INNER--\r\n",
            "--OUTER--\r\n",
        );

        let text = message_text(eml.as_bytes()).unwrap();
        assert!(text.contains("Nested plain body"));
    }

    #[test]
    fn test_message_without_text_parts_is_empty() {
        let eml = concat!(
            "Content-Type: application/pdf\r\n",
            "Content-Transfer-Encoding: base64\r\n",
            "\r\n",
            "JVBERi0xLjQ=\r\n",
        );

        assert_eq!(message_text(eml.as_bytes()).unwrap(), "");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_eml(Path::new("/nonexistent/bulletin.eml"));
        match result {
            Err(MailcalError::Io(_)) => {}
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
