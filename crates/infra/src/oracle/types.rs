//! Wire types for the oracle HTTP APIs.

use serde::{Deserialize, Serialize};

/// Single user-role message; both providers share the shape.
#[derive(Debug, Serialize)]
pub(crate) struct Message {
    pub role: String,
    pub content: String,
}

/* -------------------------------------------------------------------------- */
/* Anthropic messages API */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
pub(crate) struct AnthropicRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicResponse {
    pub content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicContent {
    pub text: String,
}

/* -------------------------------------------------------------------------- */
/* OpenAI chat completions API */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessage {
    pub content: String,
}
