//! Tolerant extraction of structured data from free-form model text.
//!
//! Models asked for JSON frequently wrap it in markdown fences or prose.
//! The parser tries strict decoding first, then falls back to fence and
//! balanced-delimiter extraction. Failure is a value, never a panic; callers
//! decide whether a failure is tolerable.

use thiserror::Error;

/// Maximum allowed raw response length (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Why structured parsing failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("Response is empty")]
    Empty,

    #[error("Response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("JSON decode error: {0}")]
    Decode(String),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Parses semi-structured model output into validated JSON values.
#[derive(Debug, Clone, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses a raw model response into a JSON object, requiring the named
    /// top-level fields to be present and non-null.
    ///
    /// # Steps
    /// 1. Reject empty or oversized input
    /// 2. Strip control characters
    /// 3. Extract JSON (direct, fenced, or embedded in prose)
    /// 4. Decode and check required fields
    pub fn parse_structured(
        &self,
        raw: &str,
        required_fields: &[&str],
    ) -> Result<serde_json::Value, ParseFailure> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ParseFailure::Empty);
        }
        if trimmed.len() > MAX_RESPONSE_LENGTH {
            return Err(ParseFailure::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: trimmed.len(),
            });
        }

        let cleaned = remove_control_chars(trimmed);
        let json_str = extract_json(&cleaned);

        let value: serde_json::Value =
            serde_json::from_str(&json_str).map_err(|e| ParseFailure::Decode(e.to_string()))?;

        let object = value
            .as_object()
            .ok_or_else(|| ParseFailure::NotAnObject(json_type_name(&value).to_string()))?;

        for field in required_fields {
            match object.get(*field) {
                Some(v) if !v.is_null() => {}
                _ => return Err(ParseFailure::MissingField((*field).to_string())),
            }
        }

        Ok(value)
    }
}

fn remove_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
        .collect()
}

/// Extracts the JSON payload from a response that may contain markdown code
/// blocks or surrounding prose.
fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(json) = extract_from_code_block(trimmed) {
        return json;
    }

    // Raw JSON embedded in prose - pick whichever delimiter comes first
    let obj_start = trimmed.find('{');
    let arr_start = trimmed.find('[');

    let (start, open, close) = match (obj_start, arr_start) {
        (Some(o), Some(a)) if a < o => (a, '[', ']'),
        (Some(o), _) => (o, '{', '}'),
        (None, Some(a)) => (a, '[', ']'),
        (None, None) => return trimmed.to_string(),
    };

    if let Some(json) = extract_balanced(trimmed, start, open, close) {
        return json;
    }

    // Let the JSON decoder produce the error
    trimmed.to_string()
}

fn extract_from_code_block(s: &str) -> Option<String> {
    let patterns = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

    for pattern in patterns {
        if let Some(start) = s.find(pattern) {
            let json_start = start + pattern.len();
            if let Some(end) = s[json_start..].find("```") {
                return Some(s[json_start..json_start + end].trim().to_string());
            }
        }
    }
    None
}

fn extract_balanced(s: &str, start: usize, open: char, close: char) -> Option<String> {
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(s[start..start + i + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
