//! Locate a JSON payload inside free-form oracle replies.
//!
//! Replies often wrap the payload in commentary or code fences. Objects are
//! looked for first, then lists; for each kind only the first opening
//! delimiter is considered. The span is found by depth counting that skips
//! delimiters inside JSON strings, so nested objects are kept whole.

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Find and parse the first JSON object, or failing that the first JSON list.
/// Returns `None` when there is no candidate or it does not parse.
pub fn extract_payload(text: &str) -> Option<Value> {
    let candidate = balanced_span(text, '{', '}').or_else(|| balanced_span(text, '[', ']'))?;

    match serde_json::from_str(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to decode JSON payload from oracle reply: {}", e);
            debug!("Rejected payload: {}", candidate);
            None
        }
    }
}

/// Like `extract_payload`, but only accepts an object.
pub fn extract_object(text: &str) -> Option<Map<String, Value>> {
    match extract_payload(text)? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
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

        if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + offset + c.len_utf8()]);
            }
        }
    }

    None
}
