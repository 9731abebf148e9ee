//! The JSON schema attached to every analysis request as its structured-output constraint.

use serde_json::{json, Value};

/// Identifier under which the schema is sent to the model.
pub const TASK_SCHEMA_NAME: &str = "task_schema";

/// Fields that must be present and non-empty in every model answer.
pub const REQUIRED_FIELDS: [&str; 2] = ["title", "category"];

/// Builds the task schema. Descriptions are in the output locale (Hebrew).
pub fn task_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "כותרת קצרה ותמציתית של המשימה"
            },
            "dueDate": {
                "type": ["string", "null"],
                "description": "תאריך היעד בפורמט YYYY-MM-DD או null"
            },
            "dueTime": {
                "type": ["string", "null"],
                "description": "שעת היעד בפורמט HH:MM 24 שעות או null"
            },
            "category": {
                "type": "string",
                "description": "קטגוריה מותאמת למשימה (למשל: 'עבודה', 'אישי', 'סידורים', 'קניות')"
            },
            "isCompleted": {
                "type": "boolean",
                "description": "האם המשימה הושלמה? תמיד false עבור משימה חדשה"
            }
        },
        "required": REQUIRED_FIELDS,
        "additionalProperties": false
    })
}
