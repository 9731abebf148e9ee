//! Task Extractor: frames free text into a structured-output request, sends it
//! once, and turns the answer into a validated `Task`.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::llm_client::{LlmResponse, Message, Role, StructuredModel, StructuredRequest};
use crate::tasks::error::ExtractionError;
use crate::tasks::models::Task;
use crate::tasks::prompts::{build_user_prompt, TASK_ANALYZE_SYSTEM};
use crate::tasks::schema::{task_schema, TASK_SCHEMA_NAME};
use crate::tasks::validation::parse_task;

/// Stateless extraction service. Cheap to clone; clones share the model handle.
///
/// Built without a model when the client could not be initialized; every
/// call then fails with `ServiceUnavailable` before touching the network.
#[derive(Clone)]
pub struct TaskExtractor {
    model: Option<Arc<dyn StructuredModel>>,
}

impl TaskExtractor {
    pub fn new(model: Arc<dyn StructuredModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn unavailable() -> Self {
        Self { model: None }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub async fn extract(&self, raw_text: &str) -> Result<Task, ExtractionError> {
        let model = self
            .model
            .as_ref()
            .ok_or(ExtractionError::ServiceUnavailable)?;

        let user_text = raw_text.trim();
        if user_text.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let request = build_request(user_text);
        debug!("Analyzing task text ({} chars)", user_text.chars().count());

        let response = model.complete(&request).await.map_err(|e| {
            warn!("Task analysis call failed: {e}");
            ExtractionError::ExternalService(e)
        })?;

        let text = response_text(&response)?;
        let task = parse_task(text).map_err(|e| {
            match &e {
                ExtractionError::MalformedResponse { reason, raw } => {
                    error!("Unparseable model output ({reason}): {raw}")
                }
                _ => warn!("Model output rejected ({e}): {text}"),
            }
            e
        })?;

        info!("Task analyzed: category={}", task.category);
        Ok(task)
    }
}

/// Builds the two-message request with the task schema attached.
pub fn build_request(user_text: &str) -> StructuredRequest {
    StructuredRequest {
        messages: vec![
            Message {
                role: Role::System,
                content: TASK_ANALYZE_SYSTEM.to_string(),
            },
            Message {
                role: Role::User,
                content: build_user_prompt(user_text),
            },
        ],
        schema_name: TASK_SCHEMA_NAME,
        schema: task_schema(),
    }
}

/// The JSON text of the first message's first content block.
fn response_text(response: &LlmResponse) -> Result<&str, ExtractionError> {
    let block = response.message_content().ok_or_else(|| {
        let status = response.status.as_deref().unwrap_or("unknown");
        ExtractionError::malformed(
            format!("no message content in response (status: {status})"),
            "",
        )
    })?;
    let text = block.text.as_deref().unwrap_or_default();

    match block.block_type.as_str() {
        "output_text" => {}
        "refusal" => {
            let refusal = block.refusal.as_deref().unwrap_or_default();
            return Err(ExtractionError::malformed(
                format!("model refused: {refusal}"),
                refusal,
            ));
        }
        other => {
            return Err(ExtractionError::malformed(
                format!("unexpected content type '{other}'"),
                text,
            ));
        }
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::malformed("empty output text", text));
    }
    Ok(trimmed)
}
