//! OpenAI chat completions backend for the `Oracle` port.

use async_trait::async_trait;
use mailcal_core::Oracle;
use mailcal_domain::{MailcalError, Result};
use tracing::debug;

use super::oracle_error;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, Message};
use crate::errors::InfraError;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiOracle {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAiOracle {
    pub fn new(api_key: String, model: String) -> Self {
        Self { http: reqwest::Client::new(), api_key, model, api_url: OPENAI_API_URL.to_string() }
    }

    /// Point the client at a custom API URL (for testing).
    #[cfg(test)]
    pub(crate) fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    // This backend sends no max_tokens cap on the wire.
    async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message { role: "user".to_string(), content: prompt.to_string() }],
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(InfraError::from)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Received OpenAI API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(oracle_error(status.as_u16(), &body));
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| MailcalError::Remote(format!("malformed OpenAI response: {e}")))?;
        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| MailcalError::Remote("OpenAI response contained no choices".into()))
    }
}
