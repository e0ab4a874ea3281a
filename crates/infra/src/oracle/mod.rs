//! LLM oracle backends
//!
//! Provider-tagged backends behind the `Oracle` port, plus the factory
//! that picks one from resolved configuration.

pub mod anthropic;
pub mod openai;
pub(crate) mod types;

use std::sync::Arc;

use mailcal_core::Oracle;
use mailcal_domain::constants::{PROVIDER_ANTHROPIC, PROVIDER_OPENAI};
use mailcal_domain::{MailcalError, ResolvedOracleConfig, Result};

pub use anthropic::AnthropicOracle;
pub use openai::OpenAiOracle;

/// Build the oracle backend named by the resolved configuration.
///
/// # Errors
/// Returns `MailcalError::Config` for provider tags this build does not
/// support.
pub fn create_oracle(config: &ResolvedOracleConfig) -> Result<Arc<dyn Oracle>> {
    match config.provider.as_str() {
        PROVIDER_ANTHROPIC => {
            Ok(Arc::new(AnthropicOracle::new(config.api_key.clone(), config.model.clone())))
        }
        PROVIDER_OPENAI => {
            Ok(Arc::new(OpenAiOracle::new(config.api_key.clone(), config.model.clone())))
        }
        other => Err(MailcalError::Config(format!("unsupported llm_provider: {other}"))),
    }
}

/// Map a non-success oracle response into the domain taxonomy.
pub(crate) fn oracle_error(status: u16, body: &str) -> MailcalError {
    match status {
        401 | 403 => {
            MailcalError::Auth(format!("oracle rejected API key (HTTP {status}): {body}"))
        }
        _ => MailcalError::Remote(format!("oracle request failed (HTTP {status}): {body}")),
    }
}
