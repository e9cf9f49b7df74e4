//! Recovers a single JSON object from raw oracle text.
//!
//! Models are told to answer with bare JSON but routinely wrap it in code
//! fences or surround it with commentary. Extraction is purely syntactic:
//! a balanced but meaningless object is still handed to the validator.

const FENCE: &str = "```";

/// Returns the first balanced `{ ... }` object in `raw`, or `None`.
///
/// # Steps
/// 1. Trim surrounding whitespace
/// 2. Strip a leading fence (with optional language tag) and a trailing fence
/// 3. Find the first `{`
/// 4. Track nesting depth until it returns to zero
///
/// Braces inside JSON string literals do not affect the depth. If the depth
/// never returns to zero, no candidate is returned.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let text = strip_code_fence(raw.trim());
    let start = text.find('{')?;
    balanced_object(text, start)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };

    // Language tag such as `json` or `JSON` directly after the opening fence.
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let rest = rest.trim_end();
    let rest = rest.strip_suffix(FENCE).unwrap_or(rest);
    rest.trim()
}

fn balanced_object(text: &str, start: usize) -> Option<&str> {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
