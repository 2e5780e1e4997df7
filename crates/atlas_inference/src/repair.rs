//! Best-effort recovery of a JSON object from model output that ignored
//! the formatting instructions (markdown fencing, chatter before or
//! after the object, truncated tails).

/// Trims the accumulated response down to a JSON object candidate:
/// strips fencing backticks and whitespace, drops everything before the
/// first `{`, and everything after the last `}`. Never fails; if no
/// brace exists the trimmed text passes through unchanged and the
/// downstream parse decides.
pub fn extract_json_candidate(raw: &str) -> String {
    let mut candidate = raw.trim_matches(|c: char| c == '`' || c.is_whitespace());
    if !candidate.starts_with('{') {
        if let Some(open) = candidate.find('{') {
            candidate = &candidate[open..];
        }
    }
    if !candidate.ends_with('}') {
        if let Some(close) = candidate.rfind('}') {
            candidate = &candidate[..=close];
        }
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_object_passes_through() {
        assert_eq!(extract_json_candidate(r#"{"title": "x"}"#), r#"{"title": "x"}"#);
    }

    #[test]
    fn markdown_fencing_is_stripped() {
        let raw = "```json\n{\"title\": \"x\"}\n```";
        assert_eq!(extract_json_candidate(raw), r#"{"title": "x"}"#);

        let noisy = "```json\nhere you go: {\"a\": 1} hope that helps\n```";
        assert_eq!(extract_json_candidate(noisy), r#"{"a": 1}"#);
    }

    #[test]
    fn leading_and_trailing_chatter_is_dropped() {
        let raw = "Sure! Here is the JSON: {\"a\": 1} Let me know if you need more.";
        assert_eq!(extract_json_candidate(raw), r#"{"a": 1}"#);
    }

    #[test]
    fn truncation_keeps_up_to_the_last_closing_brace() {
        let raw = r#"{"a": {"b": 1}, "c": tru"#;
        assert_eq!(extract_json_candidate(raw), r#"{"a": {"b": 1}"#);
    }

    #[test]
    fn no_opening_brace_passes_through_trimmed() {
        assert_eq!(extract_json_candidate("  no json here  "), "no json here");
    }

    #[test]
    fn no_closing_brace_passes_through() {
        assert_eq!(extract_json_candidate("{\"a\": 1"), "{\"a\": 1");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(extract_json_candidate(""), "");
        assert_eq!(extract_json_candidate("  \n "), "");
        assert_eq!(extract_json_candidate("```"), "");
    }
}
