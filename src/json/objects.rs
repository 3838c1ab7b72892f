// src/json/objects.rs
//! Structural scanning: array members and object members as raw slices.
//!
//! One forward pass per call with a depth counter. Quoted strings are
//! tracked so that braces, brackets and escaped quotes inside text never
//! move the depth.

use super::fields::{locate_value, skip_whitespace, string_end};

/// Member objects of the array that starts at or after `from`.
///
/// Each time brace depth returns to zero the span since it left zero is
/// emitted. Scanning stops at the array's closing bracket; a truncated
/// array yields the complete objects seen so far.
pub fn extract_objects(json: &str, from: usize) -> Vec<&str> {
    let bytes = json.as_bytes();
    let Some(open) = json.get(from..).and_then(|rest| rest.find('[')) else {
        return Vec::new();
    };

    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut object_start = 0;
    let mut in_string = false;
    let mut pos = from + open + 1;

    while pos < bytes.len() {
        let b = bytes[pos];
        if in_string {
            match b {
                b'\\' => pos += 1,
                b'"' => in_string = false,
                _ => {}
            }
        } else {
            match b {
                b'"' => in_string = true,
                b'{' => {
                    if depth == 0 {
                        object_start = pos;
                    }
                    depth += 1;
                }
                b'}' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        objects.push(&json[object_start..=pos]);
                    }
                }
                b']' if depth == 0 => break,
                _ => {}
            }
        }
        pos += 1;
    }

    objects
}

/// Member objects of the array stored under `key`.
pub fn extract_array<'a>(json: &'a str, key: &str) -> Vec<&'a str> {
    match locate_value(json, key) {
        Some(pos) if json.as_bytes().get(pos) == Some(&b'[') => extract_objects(json, pos),
        _ => Vec::new(),
    }
}

/// The complete JSON value starting at `start` (after optional whitespace).
///
/// Objects and arrays are balanced, strings run to their closing quote,
/// literals run to the next delimiter.
pub fn value_span(json: &str, start: usize) -> Option<&str> {
    let bytes = json.as_bytes();
    let start = skip_whitespace(bytes, start);
    let first = *bytes.get(start)?;

    let end = match first {
        b'{' | b'[' => balanced_end(bytes, start)?,
        b'"' => string_end(bytes, start)?,
        _ => {
            let mut end = start;
            while end < bytes.len()
                && !matches!(bytes[end], b',' | b'}' | b']')
                && !bytes[end].is_ascii_whitespace()
            {
                end += 1;
            }
            end.checked_sub(1).filter(|&e| e >= start)?
        }
    };

    Some(&json[start..=end])
}

fn balanced_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut pos = open;

    while pos < bytes.len() {
        let b = bytes[pos];
        if in_string {
            match b {
                b'\\' => pos += 1,
                b'"' => in_string = false,
                _ => {}
            }
        } else {
            match b {
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(pos);
                    }
                }
                _ => {}
            }
        }
        pos += 1;
    }
    None
}

/// Top-level `"name": value` members of the object stored under `key`.
pub fn extract_members<'a>(json: &'a str, key: &str) -> Vec<(&'a str, &'a str)> {
    locate_value(json, key)
        .and_then(|pos| value_span(json, pos))
        .map(object_members)
        .unwrap_or_default()
}

/// Top-level members of an object span, in document order.
///
/// Names are returned verbatim (escapes are not decoded). Anything that is
/// not an object yields no members.
pub fn object_members(object: &str) -> Vec<(&str, &str)> {
    let bytes = object.as_bytes();
    let open = skip_whitespace(bytes, 0);
    if bytes.get(open) != Some(&b'{') {
        return Vec::new();
    }

    let mut members = Vec::new();
    let mut pos = open + 1;
    loop {
        pos = skip_whitespace(bytes, pos);
        match bytes.get(pos) {
            Some(b',') => pos += 1,
            Some(b'"') => {
                let Some(name_end) = string_end(bytes, pos) else {
                    break;
                };
                let name = &object[pos + 1..name_end];
                let colon = skip_whitespace(bytes, name_end + 1);
                if bytes.get(colon) != Some(&b':') {
                    break;
                }
                let value_start = skip_whitespace(bytes, colon + 1);
                let Some(value) = value_span(object, value_start) else {
                    break;
                };
                members.push((name, value));
                pos = value_start + value.len();
            }
            _ => break,
        }
    }

    members
}

/// Value of the top-level member `name` of an object span.
pub fn member_value<'a>(object: &'a str, name: &str) -> Option<&'a str> {
    object_members(object)
        .into_iter()
        .find(|(member, _)| *member == name)
        .map(|(_, value)| value)
}

/// Member objects of the top-level array member `name` of an object span.
///
/// Arrays of the same name nested deeper in the object are never matched.
pub fn member_array<'a>(object: &'a str, name: &str) -> Vec<&'a str> {
    match member_value(object, name) {
        Some(array) if array.starts_with('[') => extract_objects(array, 0),
        _ => Vec::new(),
    }
}

/// Verbatim contents of the top-level string member `name`.
///
/// `None` when the member is missing or is not a string (e.g. `null`).
pub fn member_string<'a>(object: &'a str, name: &str) -> Option<&'a str> {
    member_value(object, name)?
        .strip_prefix('"')?
        .strip_suffix('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_three_objects() {
        let json = r#"{"results":[{"id":"a"},{"id":"b","nested":{"x":1}},{"id":"c"}],"has_more":false}"#;
        let objects = extract_array(json, "results");
        assert_eq!(
            objects,
            vec![r#"{"id":"a"}"#, r#"{"id":"b","nested":{"x":1}}"#, r#"{"id":"c"}"#]
        );
        for object in objects {
            assert!(serde_json::from_str::<serde_json::Value>(object).is_ok());
        }
    }

    #[test]
    fn test_braces_inside_strings_do_not_split() {
        let json = r#"{"results":[{"t":"a } { b"},{"t":"quote \" } ]"}]}"#;
        let objects = extract_array(json, "results");
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1], r#"{"t":"quote \" } ]"}"#);
    }

    #[test]
    fn test_empty_and_missing_arrays() {
        assert!(extract_array(r#"{"results":[]}"#, "results").is_empty());
        assert!(extract_array(r#"{"object":"list"}"#, "results").is_empty());
        assert!(extract_array(r#"{"results":null}"#, "results").is_empty());
    }

    #[test]
    fn test_truncated_array_keeps_complete_objects() {
        let json = r#"{"results":[{"id":"a"},{"id":"b""#;
        assert_eq!(extract_array(json, "results"), vec![r#"{"id":"a"}"#]);
    }

    #[test]
    fn test_scan_stops_at_closing_bracket() {
        let json = r#"{"results":[{"id":"a"}],"other":[{"id":"z"}]}"#;
        assert_eq!(extract_objects(json, 0), vec![r#"{"id":"a"}"#]);
    }

    #[test]
    fn test_value_span() {
        let json = r#"{"a": {"b":[1,2,{"c":"}"}]} , "n": 12, "s":"x\"y"}"#;
        let a = locate_value(json, "a").unwrap();
        assert_eq!(value_span(json, a), Some(r#"{"b":[1,2,{"c":"}"}]}"#));
        let n = locate_value(json, "n").unwrap();
        assert_eq!(value_span(json, n), Some("12"));
        let s = locate_value(json, "s").unwrap();
        assert_eq!(value_span(json, s), Some(r#""x\"y""#));
    }

    #[test]
    fn test_extract_members() {
        let json = r#"{"object":"database","properties":{"Name":{"id":"title","type":"title","title":{}},"Score":{"id":"a%3B","type":"number","number":{"format":"number"}}},"url":"x"}"#;
        let members = extract_members(json, "properties");
        let names: Vec<_> = members.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["Name", "Score"]);
        assert!(members[1].1.contains(r#""type":"number""#));
    }

    #[test]
    fn test_member_value_is_top_level_only() {
        let object = r#"{"Name":{"id":"title"},"id":{"type":"url"}}"#;
        assert_eq!(member_value(object, "id"), Some(r#"{"type":"url"}"#));
        assert_eq!(member_value(object, "type"), None);
        assert!(object_members("[1,2]").is_empty());
    }

    #[test]
    fn test_member_lookups_skip_nested_keys() {
        let body = r#"{"results":[{"id":"a","properties":{"Rel":{"type":"relation","relation":[],"has_more":false,"next_cursor":"inner"}}}],"next_cursor":"abc","has_more":true}"#;
        assert_eq!(member_array(body, "results").len(), 1);
        assert_eq!(member_string(body, "next_cursor"), Some("abc"));
        assert_eq!(member_value(body, "has_more"), Some("true"));

        let nested_only = r#"{"page":{"results":[{"id":"x"}]},"next_cursor":null}"#;
        assert!(member_array(nested_only, "results").is_empty());
        assert_eq!(member_string(nested_only, "next_cursor"), None);
    }
}
