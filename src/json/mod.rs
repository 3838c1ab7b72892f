// src/json/mod.rs
//! Field extraction over raw JSON text.
//!
//! No document tree is ever built. Callers ask for one scalar, one array of
//! objects, or one typed property, and get borrowed slices of the response
//! text back. Anything that cannot be found is reported as absent.

mod fields;
mod objects;
mod properties;

pub use fields::{find_bool, find_number, find_string, locate_value};
pub use objects::{
    extract_array, extract_members, extract_objects, member_array, member_string, member_value,
    object_members, value_span,
};
pub use properties::extract_property;

/// Whether the top-level member `key` of the object is the literal `true`.
///
/// Flags of the same name inside nested objects (relation properties carry
/// their own `has_more`) do not count.
pub fn is_flag_set(json: &str, key: &str) -> bool {
    member_value(json, key) == Some("true")
}

/// Escapes text for embedding inside a JSON string literal.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if (c as u32) < 0x20 => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_flag_set() {
        assert!(is_flag_set(r#"{"has_more":true}"#, "has_more"));
        assert!(is_flag_set(r#"{"has_more" : true}"#, "has_more"));
        assert!(!is_flag_set(r#"{"has_more":false}"#, "has_more"));
        assert!(!is_flag_set(r#"{"results":[]}"#, "has_more"));
        assert!(is_flag_set(
            r#"{"results":[{"relation":[],"has_more":false}],"has_more":true}"#,
            "has_more"
        ));
        assert!(!is_flag_set(
            r#"{"results":[{"relation":[],"has_more":true}],"has_more":false}"#,
            "has_more"
        ));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape("a\\b\nc"), "a\\\\b\\nc");
        assert_eq!(escape("\u{1}"), "\\u0001");

        let quoted = format!("\"{}\"", escape("tab\there \"q\" \u{7}"));
        let parsed: String = serde_json::from_str(&quoted).unwrap();
        assert_eq!(parsed, "tab\there \"q\" \u{7}");
    }
}
