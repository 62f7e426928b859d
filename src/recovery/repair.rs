//! Text-level cleanup and repair of model JSON output.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref ECHOED_NAME_RE: Regex = Regex::new(
        r#"(?s)"name"\s*:\s*"((?:[^"\\]|\\.)*)"\s*,\s*"options"\s*:\s*\[([^\]]*)\]"#
    )
    .expect("valid echoed-name regex");
    static ref QUOTED_RE: Regex =
        Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("valid quoted-string regex");
    static ref TRAILING_COMMA_RE: Regex =
        Regex::new(r",(\s*[\]}])").expect("valid trailing-comma regex");
}

/// Remove markdown fences and any prose before the first `{` or `[`.
pub fn strip_preamble(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);

    match trimmed.find(['{', '[']) {
        Some(start) => &trimmed[start..],
        None => trimmed,
    }
}

/// Cut everything after the last `}` or `]`; models sometimes append
/// commentary after otherwise valid JSON. Text with neither is returned
/// unchanged so truncated output can still be repaired.
pub fn truncate_trailing_prose(text: &str) -> &str {
    match text.rfind(['}', ']']) {
        Some(end) => &text[..=end],
        None => text,
    }
}

/// Drop a specification's own name from its options array
/// (`"name": "Grade", "options": ["Grade", "304"]`).
pub fn strip_echoed_names(text: &str) -> String {
    ECHOED_NAME_RE
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let kept: Vec<&str> = QUOTED_RE
                .captures_iter(&caps[2])
                .filter(|c| !c[1].trim().eq_ignore_ascii_case(name.trim()))
                .filter_map(|c| c.get(0).map(|m| m.as_str()))
                .collect();
            format!(r#""name": "{}", "options": [{}]"#, name, kept.join(", "))
        })
        .into_owned()
}

/// Repair JSON that was cut off mid-stream: close an unterminated string,
/// drop a dangling separator, and close every open bracket and brace in
/// reverse order of opening. Trailing commas before closers are removed.
pub fn repair_incomplete(text: &str) -> String {
    let mut repaired = text.trim_end().to_string();

    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in repaired.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    if in_string {
        if escaped {
            repaired.pop();
        }
        repaired.push('"');
    }

    let tail = repaired.trim_end();
    if tail.ends_with(',') {
        repaired = tail[..tail.len() - 1].to_string();
    } else if tail.ends_with(':') {
        repaired = format!("{tail} null");
    }

    while let Some(closer) = stack.pop() {
        repaired.push(closer);
    }

    TRAILING_COMMA_RE.replace_all(&repaired, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strip_preamble() {
        assert_eq!(strip_preamble("```json\n{\"a\":1}\n```"), "{\"a\":1}\n```");
        assert_eq!(strip_preamble("Here you go: [1,2]"), "[1,2]");
        assert_eq!(strip_preamble("no json here"), "no json here");
    }

    #[test]
    fn test_truncate_trailing_prose() {
        assert_eq!(
            truncate_trailing_prose("{\"a\":[1]} Hope this helps!"),
            "{\"a\":[1]}"
        );
        assert_eq!(truncate_trailing_prose("{\"a\":\"b"), "{\"a\":\"b");
    }

    #[test]
    fn test_strip_echoed_names() {
        let text = r#"{"config": {"name": "Grade", "options": ["grade", "304", "316"]}}"#;
        let cleaned = strip_echoed_names(text);
        let value: Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(value["config"]["options"], serde_json::json!(["304", "316"]));
        assert_eq!(value["config"]["name"], "Grade");
    }

    #[test]
    fn test_repair_closes_brackets_in_order() {
        let repaired = repair_incomplete(r#"{"config":{"name":"Grade","options":["304","316""#);
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["config"]["options"], serde_json::json!(["304", "316"]));
    }

    #[test]
    fn test_repair_unterminated_string_and_trailing_comma() {
        let repaired = repair_incomplete(r#"{"keys":[{"name":"Finish","options":["2B","No"#);
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["keys"][0]["options"], serde_json::json!(["2B", "No"]));

        let repaired = repair_incomplete(r#"{"config":{"name":"Size","options":["1 mm",]},"#);
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["config"]["options"], serde_json::json!(["1 mm"]));
    }

    #[test]
    fn test_repair_dangling_key() {
        let repaired = repair_incomplete(r#"{"config":{"name":"Size","options":"#);
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert!(value["config"]["options"].is_null());
    }
}
