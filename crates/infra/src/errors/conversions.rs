//! Conversions from external infrastructure errors into domain errors.

use mailcal_domain::MailcalError;
use mailparse::MailParseError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MailcalError);

impl From<InfraError> for MailcalError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MailcalError> for InfraError {
    fn from(value: MailcalError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoMailcalError {
    fn into_mailcal(self) -> MailcalError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → MailcalError */
/* -------------------------------------------------------------------------- */

impl IntoMailcalError for HttpError {
    fn into_mailcal(self) -> MailcalError {
        if self.is_timeout() {
            return MailcalError::Remote("HTTP request timed out".into());
        }

        if self.is_connect() {
            return MailcalError::Remote("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => MailcalError::Auth(message),
                _ => MailcalError::Remote(message),
            };
        }

        MailcalError::Remote(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_mailcal())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → MailcalError */
/* -------------------------------------------------------------------------- */

impl IntoMailcalError for std::io::Error {
    fn into_mailcal(self) -> MailcalError {
        MailcalError::Io(self.to_string())
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_mailcal())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → MailcalError */
/* -------------------------------------------------------------------------- */

impl IntoMailcalError for serde_json::Error {
    fn into_mailcal(self) -> MailcalError {
        MailcalError::InvalidInput(format!("invalid JSON: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_mailcal())
    }
}

/* -------------------------------------------------------------------------- */
/* csv::Error → MailcalError */
/* -------------------------------------------------------------------------- */

impl IntoMailcalError for csv::Error {
    fn into_mailcal(self) -> MailcalError {
        match self.into_kind() {
            csv::ErrorKind::Io(cause) => MailcalError::Io(cause.to_string()),
            other => MailcalError::InvalidInput(format!("invalid CSV: {other:?}")),
        }
    }
}

impl From<csv::Error> for InfraError {
    fn from(value: csv::Error) -> Self {
        InfraError(value.into_mailcal())
    }
}

/* -------------------------------------------------------------------------- */
/* mailparse::MailParseError → MailcalError */
/* -------------------------------------------------------------------------- */

impl IntoMailcalError for MailParseError {
    fn into_mailcal(self) -> MailcalError {
        MailcalError::InvalidInput(format!("malformed email: {self}"))
    }
}

impl From<MailParseError> for InfraError {
    fn from(value: MailParseError) -> Self {
        InfraError(value.into_mailcal())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
