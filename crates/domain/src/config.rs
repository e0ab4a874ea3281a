//! Configuration management
//!
//! Resolved once at startup by the infra loader and passed down; nothing
//! re-reads configuration from disk per call.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALENDAR_ID, DEFAULT_CREDENTIALS_PATH, DEFAULT_TIMEZONE, DEFAULT_TOKEN_PATH,
    PROVIDER_ANTHROPIC, PROVIDER_OPENAI,
};
use crate::errors::{MailcalError, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target calendar. The account's primary calendar unless overridden.
    pub calendar_id: String,
    /// IANA timezone label attached to timed event creates.
    pub timezone: String,
    pub oracle: OracleConfig,
    /// Persisted OAuth token (single-writer file; run one instance at a time).
    pub token_path: PathBuf,
    /// Google installed-app client secret file.
    pub credentials_path: PathBuf,
}

/// Generative-text oracle configuration.
///
/// All three fields are required by any oracle-backed command but the
/// loader leaves them optional so calendar-only commands work without
/// them; [`OracleConfig::resolve`] enforces presence when the oracle is
/// actually needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OracleConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

/// Fully-validated oracle settings.
#[derive(Debug, Clone)]
pub struct ResolvedOracleConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
}

impl OracleConfig {
    /// Validate that provider, model, and key are all present and the
    /// provider tag is one we support. The first missing key aborts with a
    /// `Config` error naming it, before any remote call is made.
    pub fn resolve(&self) -> Result<ResolvedOracleConfig> {
        let provider = require(&self.provider, "llm_provider")?;
        let model = require(&self.model, "llm_model")?;
        let api_key = require(&self.api_key, "llm_api_key")?;

        if provider != PROVIDER_ANTHROPIC && provider != PROVIDER_OPENAI {
            return Err(MailcalError::Config(format!(
                "unsupported llm_provider: {provider}"
            )));
        }

        Ok(ResolvedOracleConfig { provider, model, api_key })
    }
}

fn require(value: &Option<String>, key: &str) -> Result<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| MailcalError::Config(format!("missing '{key}'")))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            oracle: OracleConfig::default(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
        }
    }
}
