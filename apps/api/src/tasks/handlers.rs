//! Axum route handlers for task analysis.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;
use crate::tasks::models::{AnalyzeTaskRequest, Task};

/// POST /analyze-task
///
/// Turns `{"text": "..."}` into a structured task. A body that is not a JSON
/// object with a string `text` is treated as if no text was sent.
pub async fn handle_analyze_task(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let text = match payload {
        Ok(Json(request)) => request.text.unwrap_or_default(),
        Err(rejection) => {
            warn!("Rejected analyze-task body: {rejection}");
            String::new()
        }
    };

    let task = state.extractor.extract(&text).await?;

    Ok(Json(task))
}
