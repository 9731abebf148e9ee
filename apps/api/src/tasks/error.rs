use thiserror::Error;

use crate::llm_client::LlmError;

/// Every way `TaskExtractor::extract` can fail.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no text provided")]
    EmptyInput,

    #[error("OpenAI client is not initialized")]
    ServiceUnavailable,

    #[error("external service error: {0}")]
    ExternalService(#[from] LlmError),

    /// `raw` holds the model text as received (empty when there was none).
    /// It stays out of the message so it never reaches an HTTP client.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    #[error("schema violation on field '{field}': {reason}")]
    SchemaViolation { field: &'static str, reason: String },
}

impl ExtractionError {
    pub(crate) fn malformed(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    pub(crate) fn violation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field,
            reason: reason.into(),
        }
    }
}
