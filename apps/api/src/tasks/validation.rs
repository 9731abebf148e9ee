//! Parse-then-validate pipeline for model output. Nothing in the payload is trusted.

use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value};

use crate::tasks::error::ExtractionError;
use crate::tasks::models::Task;

/// Parses model text into a validated, normalized `Task`.
///
/// Invalid JSON or a non-object document is a `MalformedResponse`; a document
/// that parses but breaks the task contract is a `SchemaViolation`.
pub fn parse_task(text: &str) -> Result<Task, ExtractionError> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| ExtractionError::malformed(format!("invalid JSON: {e}"), text))?;

    let Value::Object(fields) = document else {
        return Err(ExtractionError::malformed("expected a JSON object", text));
    };

    validate_task(&fields)
}

/// Validates a parsed object against the task contract.
/// `isCompleted` is never read; the result is always not completed.
pub fn validate_task(fields: &Map<String, Value>) -> Result<Task, ExtractionError> {
    let title = required_text(fields, "title")?;
    let category = required_text(fields, "category")?;
    let due_date = optional_formatted(fields, "dueDate", is_valid_date, "YYYY-MM-DD")?;
    let due_time = optional_formatted(fields, "dueTime", is_valid_time, "HH:MM")?;

    Ok(Task {
        title,
        due_date,
        due_time,
        category,
        is_completed: false,
    })
}

fn required_text(fields: &Map<String, Value>, field: &'static str) -> Result<String, ExtractionError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ExtractionError::violation(field, "missing")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ExtractionError::violation(field, "empty"))
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ExtractionError::violation(
            field,
            format!("expected a string, got {}", type_name(other)),
        )),
    }
}

fn optional_formatted(
    fields: &Map<String, Value>,
    field: &'static str,
    is_valid: fn(&str) -> bool,
    format: &str,
) -> Result<Option<String>, ExtractionError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if is_valid(s) => Ok(Some(s.clone())),
        Some(Value::String(s)) => Err(ExtractionError::violation(
            field,
            format!("'{s}' is not in {format} format"),
        )),
        Some(other) => Err(ExtractionError::violation(
            field,
            format!("expected a string or null, got {}", type_name(other)),
        )),
    }
}

/// Exactly `YYYY-MM-DD` and a real calendar date.
fn is_valid_date(s: &str) -> bool {
    has_shape(s, "dddd-dd-dd") && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Exactly `HH:MM` on a 24-hour clock.
fn is_valid_time(s: &str) -> bool {
    has_shape(s, "dd:dd") && NaiveTime::parse_from_str(s, "%H:%M").is_ok()
}

// chrono accepts unpadded fields, so the layout is pinned separately.
fn has_shape(s: &str, shape: &str) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(c, p)| match p {
            b'd' => c.is_ascii_digit(),
            _ => c == p,
        })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_violation(result: Result<Task, ExtractionError>, expected: &str) {
        match result {
            Err(ExtractionError::SchemaViolation { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected schema violation on {expected}, got {other:?}"),
        }
    }

    #[test]
    fn test_full_task_parses() {
        let task = parse_task(
            r#"{"title":"לקנות חלב","dueDate":"2025-01-02","dueTime":"19:00","category":"קניות"}"#,
        )
        .unwrap();

        assert_eq!(task.title, "לקנות חלב");
        assert_eq!(task.due_date.as_deref(), Some("2025-01-02"));
        assert_eq!(task.due_time.as_deref(), Some("19:00"));
        assert_eq!(task.category, "קניות");
        assert!(!task.is_completed);
    }

    #[test]
    fn test_missing_and_null_date_time_become_none() {
        let task = parse_task(r#"{"title":"לסדר את הבית","category":"אישי","dueTime":null}"#)
            .unwrap();
        assert_eq!(task.due_date, None);
        assert_eq!(task.due_time, None);
    }

    #[test]
    fn test_is_completed_from_model_is_ignored() {
        let task =
            parse_task(r#"{"title":"דוח","category":"עבודה","isCompleted":true}"#).unwrap();
        assert!(!task.is_completed);

        // Even a wrongly typed value does not matter.
        let task =
            parse_task(r#"{"title":"דוח","category":"עבודה","isCompleted":"yes"}"#).unwrap();
        assert!(!task.is_completed);
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let task = parse_task(r#"{"title":"a","category":"b","priority":"high"}"#).unwrap();
        assert_eq!(
            serde_json::to_value(&task).unwrap().as_object().unwrap().len(),
            5
        );
    }

    #[test]
    fn test_title_is_kept_as_parsed() {
        let task = parse_task(r#"{"title":"  לקנות חלב ","category":"קניות"}"#).unwrap();
        assert_eq!(task.title, "  לקנות חלב ");
    }

    #[test]
    fn test_missing_title() {
        assert_violation(parse_task(r#"{"category":"קניות"}"#), "title");
    }

    #[test]
    fn test_null_title() {
        assert_violation(parse_task(r#"{"title":null,"category":"קניות"}"#), "title");
    }

    #[test]
    fn test_blank_category() {
        assert_violation(parse_task(r#"{"title":"a","category":"  "}"#), "category");
    }

    #[test]
    fn test_non_string_category() {
        assert_violation(parse_task(r#"{"title":"a","category":3}"#), "category");
    }

    #[test]
    fn test_bad_dates() {
        for date in ["02-01-2025", "2025-1-2", "2025-02-30", "", "tomorrow"] {
            let text = format!(r#"{{"title":"a","category":"b","dueDate":"{date}"}}"#);
            assert_violation(parse_task(&text), "dueDate");
        }
        assert_violation(
            parse_task(r#"{"title":"a","category":"b","dueDate":20250102}"#),
            "dueDate",
        );
    }

    #[test]
    fn test_bad_times() {
        for time in ["7:00", "24:00", "19:60", "19:00:00", "7pm", ""] {
            let text = format!(r#"{{"title":"a","category":"b","dueTime":"{time}"}}"#);
            assert_violation(parse_task(&text), "dueTime");
        }
    }

    #[test]
    fn test_leap_day_and_midnight_are_valid() {
        let task =
            parse_task(r#"{"title":"a","category":"b","dueDate":"2024-02-29","dueTime":"00:00"}"#)
                .unwrap();
        assert_eq!(task.due_date.as_deref(), Some("2024-02-29"));
        assert_eq!(task.due_time.as_deref(), Some("00:00"));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_task("Sure! Here is your task: buy milk").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse { .. }));
    }

    #[test]
    fn test_malformed_keeps_raw_text() {
        for text in ["Sure! Here is your task: buy milk", r#"["title","category"]"#] {
            match parse_task(text) {
                Err(ExtractionError::MalformedResponse { raw, .. }) => assert_eq!(raw, text),
                other => panic!("expected malformed response, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_message_omits_raw_text() {
        let err = parse_task("secret model chatter").unwrap_err();
        assert!(err.to_string().starts_with("malformed response: invalid JSON"));
        assert!(!err.to_string().contains("secret model chatter"));
    }

    #[test]
    fn test_fenced_json_is_malformed() {
        let err = parse_task("```json\n{\"title\":\"a\",\"category\":\"b\"}\n```").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse { .. }));
    }

    #[test]
    fn test_non_object_is_malformed() {
        let err = parse_task(r#"[{"title":"a","category":"b"}]"#).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse { .. }));
    }

    #[test]
    fn test_violation_message_names_field() {
        let err = parse_task(r#"{"category":"b"}"#).unwrap_err();
        assert_eq!(err.to_string(), "schema violation on field 'title': missing");
    }
}
