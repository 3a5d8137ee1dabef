//! Utilities for extracting structured data from AI provider responses.
//!
//! Provider responses often contain JSON wrapped in markdown code blocks or
//! mixed with explanatory text, even when the prompt demands JSON only. The
//! extraction step runs before schema validation so the repair loop does not
//! burn a provider call on a markdown fence.

use adforge_error::{AdforgeResult, SchemaError, SchemaErrorKind};

/// Extract JSON from a response that may contain markdown or extra text.
///
/// This function tries multiple extraction strategies:
/// 1. Markdown code blocks: ```json ... ```
/// 2. Balanced braces: { ... }
/// 3. Balanced brackets: [ ... ]
///
/// # Errors
///
/// Returns an error if no JSON candidate is found in the response.
///
/// # Examples
///
/// ```
/// use adforge_pipeline::extract_json;
///
/// let response = "Here is the batch:\n\
///     \n\
///     ```json\n\
///     {\"version\": \"1.0\"}\n\
///     ```\n";
///
/// let json = extract_json(response).unwrap();
/// assert!(json.contains("1.0"));
/// ```
pub fn extract_json(response: &str) -> AdforgeResult<String> {
    // Strategy 1: Extract from markdown code blocks
    if let Some(json) = extract_from_code_block(response) {
        return Ok(json);
    }

    // Strategy 2: Balanced delimiters. Prefer whichever opens first so an
    // array of objects is not truncated to its first object.
    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');

    match (bracket_pos, brace_pos) {
        (Some(b_pos), Some(c_pos)) if b_pos < c_pos => {
            if let Some(json) = extract_balanced(response, '[', ']') {
                return Ok(json);
            }
            if let Some(json) = extract_balanced(response, '{', '}') {
                return Ok(json);
            }
        }
        (Some(_), None) => {
            if let Some(json) = extract_balanced(response, '[', ']') {
                return Ok(json);
            }
        }
        _ => {
            if let Some(json) = extract_balanced(response, '{', '}') {
                return Ok(json);
            }
            if let Some(json) = extract_balanced(response, '[', ']') {
                return Ok(json);
            }
        }
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in provider response"
    );

    Err(SchemaError::new(SchemaErrorKind::NoJson(response.len())).into())
}

/// Extract content from markdown code blocks.
///
/// Looks for patterns like:
/// - ```json\n...\n```
/// - ``` ... ``` (no language specified)
fn extract_from_code_block(response: &str) -> Option<String> {
    if let Some(start) = response.find("```json") {
        let content_start = start + "```json".len();
        if let Some(end) = response[content_start..].find("```") {
            let content = &response[content_start..content_start + end];
            return Some(content.trim().to_string());
        }
        // No closing fence found - likely truncated response
        return Some(response[content_start..].trim().to_string());
    }

    // Try without language specifier
    if let Some(start) = response.find("```") {
        let content_start = start + 3;
        // Skip to next newline (in case there's a language specifier)
        let skip_to = response[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start);

        if let Some(end) = response[skip_to..].find("```") {
            let content = &response[skip_to..skip_to + end];
            return Some(content.trim().to_string());
        }
        return Some(response[skip_to..].trim().to_string());
    }

    None
}

/// Extract content between balanced delimiters.
///
/// Finds the first occurrence of `open` and extracts content up to the
/// matching `close`, handling nesting and string escapes correctly.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_from_code_block() {
        let response = r#"
Here's the batch you requested:

```json
{
  "version": "1.0",
  "creatives": []
}
```

Hope this helps!
"#;
        let json = extract_json(response).unwrap();
        assert!(json.contains("\"version\": \"1.0\""));
        assert!(!json.contains("```"));
    }

    #[test]
    fn extracts_balanced_braces() {
        let response = r#"
Sure! Here it is: {"id": 456, "nested": {"value": "test"}}
"#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("nested"));
    }

    #[test]
    fn extracts_array() {
        let response = r#"
Here are the items:
[
  {"id": 1},
  {"id": 2}
]
"#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('['));
        assert!(json.ends_with(']'));
    }

    #[test]
    fn no_json_is_an_error() {
        let response = "This is just plain text with no JSON";
        assert!(extract_json(response).is_err());
    }

    #[test]
    fn string_escapes_do_not_break_balance() {
        let response = r#"{"hook": "She said \"try it\" {seriously}"}"#;
        let json = extract_json(response).unwrap();
        assert!(json.contains("try it"));
        assert!(json.ends_with('}'));
    }

    #[test]
    fn truncated_code_block_returns_remainder() {
        let response = "```json\n{\"version\": \"1.0\"}";
        let json = extract_json(response).unwrap();
        assert_eq!(json, "{\"version\": \"1.0\"}");
    }
}
