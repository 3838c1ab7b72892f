// src/json/fields.rs
//! Scalar field lookup on raw response text.
//!
//! Lookups find the first `"key"` used as a key and read the value right
//! after its colon. A miss is `None`, never an error.

/// Advances past ASCII whitespace.
pub(crate) fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Index of the quote closing the string whose opening quote is at `open`.
///
/// Escaped characters are skipped, not decoded.
pub(crate) fn string_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut pos = open + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' => return Some(pos),
            _ => pos += 1,
        }
    }
    None
}

/// Byte offset of the value belonging to the first `"key"` that is followed
/// by a colon. Occurrences of the quoted key used as a string value are
/// skipped.
pub fn locate_value(json: &str, key: &str) -> Option<usize> {
    let needle = format!("\"{}\"", key);
    let bytes = json.as_bytes();
    let mut from = 0;

    while let Some(found) = json.get(from..)?.find(&needle) {
        let key_start = from + found;
        let after_key = skip_whitespace(bytes, key_start + needle.len());
        if bytes.get(after_key) == Some(&b':') {
            return Some(skip_whitespace(bytes, after_key + 1));
        }
        from = key_start + 1;
    }
    None
}

/// Reads the quoted string value of `key` verbatim.
///
/// Returns `None` if the key is absent or its value is not a string
/// (`null`, a number, an object, ...).
pub fn find_string<'a>(json: &'a str, key: &str) -> Option<&'a str> {
    let start = locate_value(json, key)?;
    let bytes = json.as_bytes();
    if bytes.get(start) != Some(&b'"') {
        return None;
    }
    let end = string_end(bytes, start)?;
    Some(&json[start + 1..end])
}

/// Reads a numeric value: optional `-`, digits, at most one decimal point.
pub fn find_number(json: &str, key: &str) -> Option<f64> {
    let start = locate_value(json, key)?;
    parse_number_at(json, start)
}

pub(crate) fn parse_number_at(json: &str, start: usize) -> Option<f64> {
    let bytes = json.as_bytes();
    let mut end = start;
    if bytes.get(end) == Some(&b'-') {
        end += 1;
    }

    let mut seen_digit = false;
    let mut seen_point = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }
    json[start..end].parse().ok()
}

/// Reads a boolean as whichever of `true`/`false` appears first after the key.
pub fn find_bool(json: &str, key: &str) -> Option<bool> {
    let start = locate_value(json, key)?;
    let rest = &json[start..];
    match (rest.find("true"), rest.find("false")) {
        (Some(t), Some(f)) => Some(t < f),
        (Some(_), None) => Some(true),
        (None, Some(_)) => Some(false),
        (None, None) => None,
    }
}
