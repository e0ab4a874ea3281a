//! Anthropic messages API backend for the `Oracle` port.

use async_trait::async_trait;
use mailcal_core::Oracle;
use mailcal_domain::{MailcalError, Result};
use tracing::debug;

use super::oracle_error;
use super::types::{AnthropicRequest, AnthropicResponse, Message};
use crate::errors::InfraError;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicOracle {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl AnthropicOracle {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Point the client at a custom API URL (for testing).
    #[cfg(test)]
    pub(crate) fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[async_trait]
impl Oracle for AnthropicOracle {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens,
            messages: vec![Message { role: "user".to_string(), content: prompt.to_string() }],
        };

        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(InfraError::from)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Received Anthropic API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(oracle_error(status.as_u16(), &body));
        }

        let payload: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| MailcalError::Remote(format!("malformed Anthropic response: {e}")))?;
        payload
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| MailcalError::Remote("Anthropic response contained no content".into()))
    }
}
