use serde_json::Value;

/// Recover a JSON object from raw model text that may wrap it in prose or
/// markdown code fences.
///
/// Strategies are tried in order, short-circuiting on the first success:
/// 1. parse the substring from the first `{` through the last `}`;
/// 2. strip code-fence markers and parse the trimmed remainder.
///
/// Returns `None` when no object is recoverable — never a fabricated value.
/// Only objects count: arrays, scalars, and `null` yield `None`.
///
/// Note that strategy 1 deliberately spans from the first `{` to the last
/// `}`. Text containing two independent objects side by side over-captures
/// into an unparseable span and is reported as absent.
pub fn extract(raw: &str) -> Option<Value> {
    if let Some(value) = extract_braced(raw) {
        return Some(value);
    }
    parse_object(strip_fences(raw))
}

fn extract_braced(raw: &str) -> Option<Value> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    parse_object(&raw[start..=end])
}

/// Strip markdown code fences, handling an optional language tag.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(start) = trimmed.find("```json") {
        let body_start = start + "```json".len();
        if let Some(end) = trimmed[body_start..].find("```") {
            return trimmed[body_start..body_start + end].trim();
        }
    }
    if let Some(start) = trimmed.find("```") {
        let body_start = start + 3;
        if let Some(end) = trimmed[body_start..].find("```") {
            return trimmed[body_start..body_start + end].trim();
        }
    }
    trimmed
}

fn parse_object(text: &str) -> Option<Value> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    value.is_object().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_object_parses_directly() {
        assert_eq!(extract(r#"{"a": 1}"#), Some(json!({"a": 1})));
    }

    #[test]
    fn object_wrapped_in_prose() {
        let raw = r#"Sure! Here's the rewritten bullet:

{"bullet": "Led a team of 5 engineers."}

Let me know if you'd like another variant."#;
        assert_eq!(extract(raw), Some(json!({"bullet": "Led a team of 5 engineers."})));
    }

    #[test]
    fn json_code_fence() {
        let raw = "```json\n{\"score\": 87}\n```";
        assert_eq!(extract(raw), Some(json!({"score": 87})));
    }

    #[test]
    fn bare_code_fence() {
        let raw = "```\n{\"score\": 87}\n```";
        assert_eq!(extract(raw), Some(json!({"score": 87})));
    }

    #[test]
    fn nested_objects_are_fine() {
        let raw = r#"result: {"outer": {"inner": [1, 2]}} done"#;
        assert_eq!(extract(raw), Some(json!({"outer": {"inner": [1, 2]}})));
    }

    #[test]
    fn no_braces_is_absent() {
        assert_eq!(extract("I could not produce an answer."), None);
    }

    #[test]
    fn empty_string_is_absent() {
        assert_eq!(extract(""), None);
    }

    #[test]
    fn truncated_object_is_absent() {
        assert_eq!(extract("Sure! Here's your answer: {not valid"), None);
    }

    #[test]
    fn non_object_json_is_absent() {
        assert_eq!(extract("[1, 2, 3]"), None);
        assert_eq!(extract("null"), None);
        assert_eq!(extract("42"), None);
    }

    #[test]
    fn side_by_side_objects_over_capture_to_absence() {
        // First-brace-to-last-brace spans both objects; the span does not
        // parse and no fence rescues it.
        assert_eq!(extract(r#"{"a": 1} {"b": 2}"#), None);
    }

    #[test]
    fn closing_brace_before_opening_is_absent() {
        assert_eq!(extract("} nothing here {"), None);
    }
}
