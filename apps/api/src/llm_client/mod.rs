/// LLM Client: the single point of entry for all OpenAI API calls.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// Callers depend on the `StructuredModel` trait; `LlmClient` is the only
/// production implementation.
///
/// Model: gpt-4o (hardcoded, do not make configurable to prevent drift)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(test)]
pub mod mock;

/// The model used for every structured-output call.
pub const MODEL: &str = "gpt-4o";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not decode API response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged input message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// A request whose answer must be a JSON document conforming to `schema`.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub messages: Vec<Message>,
    pub schema_name: &'static str,
    pub schema: Value,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format (Responses API)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [Message],
    text: TextConfig<'a>,
}

#[derive(Debug, Serialize)]
struct TextConfig<'a> {
    format: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    name: &'a str,
    schema: &'a Value,
    /// Strict mode requires every property to be listed in `required`.
    strict: bool,
}

impl<'a> ResponsesRequest<'a> {
    fn new(request: &'a StructuredRequest) -> Self {
        Self {
            model: MODEL,
            input: &request.messages,
            text: TextConfig {
                format: JsonSchemaFormat {
                    format_type: "json_schema",
                    name: request.schema_name,
                    schema: &request.schema,
                    strict: false,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: ApiErrorBody,
}

impl LlmResponse {
    /// The first content block of the first assistant message, if any.
    /// Reasoning items that precede the message are skipped.
    pub fn message_content(&self) -> Option<&ContentBlock> {
        self.output
            .iter()
            .find(|item| item.item_type == "message")
            .and_then(|item| item.content.first())
    }
}

/// Anything that can answer a `StructuredRequest`.
///
/// Held as `Arc<dyn StructuredModel>` so tests can substitute a mock.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    async fn complete(&self, request: &StructuredRequest) -> Result<LlmResponse, LlmError>;
}

/// Wraps the OpenAI Responses API. One attempt per call, no retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Makes a single call to the Responses API, returning the full response object.
    pub async fn call(&self, request: &StructuredRequest) -> Result<LlmResponse, LlmError> {
        let body = ResponsesRequest::new(request);

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("OpenAI API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let llm_response: LlmResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Decode(e.to_string()))?;

        if let Some(error) = &llm_response.error {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error.message.clone(),
            });
        }

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        Ok(llm_response)
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout.as_secs())
        } else {
            LlmError::Http(e)
        }
    }
}

#[async_trait]
impl StructuredModel for LlmClient {
    async fn complete(&self, request: &StructuredRequest) -> Result<LlmResponse, LlmError> {
        self.call(request).await
    }
}
