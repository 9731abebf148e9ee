// Prompt constants for task analysis. Output values are Hebrew; only the
// embedded user text varies between requests.

/// System instruction: the extraction task, output locale, null policy and formats.
pub const TASK_ANALYZE_SYSTEM: &str = "אתה מנתח משימות מומחה. תפקידך הוא לקבל משפט בשפה חופשית, לנתח אותו, \
    ולחלץ ממנו את כל הפרטים הרלוונטיים (כותרת, תאריך, שעה, קטגוריה) לפורמט JSON מובנה בלבד. \
    השתמש בעברית לכל ערכי הטקסט. אם לא נמצא פרט ספציפי (כמו תאריך או שעה), השאר את השדה כ-null. \
    תאריכים צריכים להיות בפורמט YYYY-MM-DD ושעות בפורמט HH:MM.";

/// User message wrapper. Replace `{user_text}` before sending.
pub const TASK_ANALYZE_PROMPT_TEMPLATE: &str = "נתח את בקשת המשימה הבאה: '{user_text}'";

/// Wraps already-trimmed user text in the fixed user-message phrase.
pub fn build_user_prompt(user_text: &str) -> String {
    TASK_ANALYZE_PROMPT_TEMPLATE.replace("{user_text}", user_text)
}
