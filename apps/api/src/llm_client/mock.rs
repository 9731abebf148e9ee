//! In-memory `StructuredModel` for tests. Counts calls and records the last request.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::{LlmError, LlmResponse, StructuredModel, StructuredRequest};

pub enum MockReply {
    Response(LlmResponse),
    Timeout,
    Api { status: u16, message: String },
}

pub struct MockModel {
    reply: MockReply,
    calls: AtomicUsize,
    last_request: Mutex<Option<StructuredRequest>>,
}

impl MockModel {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Replies with a single `output_text` block carrying `text`.
    pub fn replying_text(text: &str) -> Self {
        Self::new(MockReply::Response(output_text_response(text)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<StructuredRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredModel for MockModel {
    async fn complete(&self, request: &StructuredRequest) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        match &self.reply {
            MockReply::Response(response) => Ok(response.clone()),
            MockReply::Timeout => Err(LlmError::Timeout(60)),
            MockReply::Api { status, message } => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Builds a Responses API payload with one message holding one `output_text` block.
pub fn output_text_response(text: &str) -> LlmResponse {
    serde_json::from_value(json!({
        "status": "completed",
        "output": [{
            "type": "message",
            "role": "assistant",
            "content": [{"type": "output_text", "text": text, "annotations": []}]
        }],
        "usage": {"input_tokens": 120, "output_tokens": 40}
    }))
    .unwrap()
}
