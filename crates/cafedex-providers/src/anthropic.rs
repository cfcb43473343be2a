//! Structured-generation adapter for the Anthropic Messages API.
//!
//! Every call forces tool use, so the model can only answer through
//! the supplied schema. A response without a tool_use block is a hard
//! failure; the callers treat the structured payload as mandatory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cafedex_core::error::{CafedexError, Result};
use cafedex_core::ports::{StructuredGenerator, StructuredResponse, ToolSchema};

use crate::retry::{provider_error, status_error, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Anthropic-backed [`StructuredGenerator`] implementation.
pub struct AnthropicGenerator {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl AnthropicGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            client: reqwest::Client::new(),
            retry,
        }
    }

    /// Override the API base URL (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl StructuredGenerator for AnthropicGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: &ToolSchema,
    ) -> Result<StructuredResponse> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: system_prompt.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user_message.to_string(),
            }],
            tools: vec![Tool {
                name: schema.name.clone(),
                description: schema.description.clone(),
                input_schema: schema.input_schema.clone(),
            }],
            tool_choice: ToolChoice { choice_type: "tool".to_string(), name: schema.name.clone() },
        };

        let response: MessagesResponse = self
            .retry
            .run(|| async {
                let response = self
                    .client
                    .post(format!("{}/v1/messages", self.base_url))
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", API_VERSION)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| provider_error("Anthropic request", e))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(status_error("Anthropic API", status.as_u16(), &body));
                }

                response
                    .json::<MessagesResponse>()
                    .await
                    .map_err(|e| provider_error("Anthropic response parse", e))
            })
            .await?;

        let tool_use = response
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::ToolUse { input, .. } => Some(input),
                _ => None,
            })
            .ok_or_else(|| CafedexError::MissingStructuredOutput {
                stop_reason: response.stop_reason.unwrap_or_else(|| "unknown".to_string()),
            })?;

        Ok(StructuredResponse {
            output: tool_use,
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ─── Wire types ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
    tools: Vec<Tool>,
    tool_choice: ToolChoice,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        #[allow(dead_code)]
        text: String,
    },
    ToolUse {
        #[allow(dead_code)]
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}
