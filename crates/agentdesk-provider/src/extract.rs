//! Best-effort recovery of a JSON object from free-form model output

use serde_json::Value;

/// The first balanced top-level `{...}` region of `text`, if there is one.
///
/// Braces inside JSON string literals do not count toward the balance.
pub fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse the first balanced object region; `None` when absent or invalid
pub fn extract_json_object(text: &str) -> Option<Value> {
    let region = first_balanced_object(text)?;
    match serde_json::from_str::<Value>(region) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}
