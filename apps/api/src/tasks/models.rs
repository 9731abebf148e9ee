use serde::{Deserialize, Serialize};

/// A task extracted from free text. Absent date/time serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub title: String,
    /// `YYYY-MM-DD`
    pub due_date: Option<String>,
    /// 24-hour `HH:MM`
    pub due_time: Option<String>,
    pub category: String,
    pub is_completed: bool,
}

/// Body of `POST /analyze-task`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeTaskRequest {
    #[serde(default)]
    pub text: Option<String>,
}
