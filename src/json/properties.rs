// src/json/properties.rs
//! Typed property extraction from a page object.

use super::fields::{find_bool, find_number, find_string, locate_value};
use super::objects::{member_value, value_span};
use crate::types::{PropertyKind, Value};

/// Reads property `name` of a page fragment as `kind`.
///
/// The search for the nested value key is confined to the property's own
/// value span. Anything missing, `null` or oddly shaped comes back as
/// [`Value::Null`].
pub fn extract_property(json: &str, name: &str, kind: PropertyKind) -> Value {
    // Properties are looked up as members of the page's `properties` object
    // so that top-level keys such as `id` never shadow a property.
    let properties = locate_value(json, "properties")
        .and_then(|pos| value_span(json, pos))
        .filter(|span| span.starts_with('{'));

    let span = match properties {
        Some(properties) => member_value(properties, name),
        None => locate_value(json, name).and_then(|pos| value_span(json, pos)),
    };
    let Some(span) = span else {
        return Value::Null;
    };

    match kind {
        PropertyKind::Title | PropertyKind::RichText => {
            find_string(span, "plain_text").map(str::to_string).into()
        }
        PropertyKind::Number => find_number(span, "number")
            .map(Value::Double)
            .unwrap_or(Value::Null),
        PropertyKind::Checkbox => find_bool(span, "checkbox")
            .map(Value::Boolean)
            .unwrap_or(Value::Null),
        PropertyKind::Select => locate_value(span, "select")
            .and_then(|pos| value_span(span, pos))
            .filter(|select| select.starts_with('{'))
            .and_then(|select| find_string(select, "name"))
            .map(str::to_string)
            .into(),
        PropertyKind::Url => find_string(span, "url").map(str::to_string).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "object": "page",
        "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
        "created_time": "2024-03-01T10:00:00.000Z",
        "properties": {
            "Name": {"id": "title", "type": "title", "title": [
                {"type": "text", "text": {"content": "Groceries", "link": null}, "plain_text": "Groceries"}
            ]},
            "Notes": {"id": "n1", "type": "rich_text", "rich_text": []},
            "Price": {"id": "p1", "type": "number", "number": 12.5},
            "Done": {"id": "d1", "type": "checkbox", "checkbox": true},
            "Stage": {"id": "s1", "type": "select", "select": {"id": "x", "name": "Doing", "color": "blue"}},
            "Empty Stage": {"id": "s2", "type": "select", "select": null},
            "Link": {"id": "u1", "type": "url", "url": "https://example.com"},
            "id": {"id": "i1", "type": "rich_text", "rich_text": [{"plain_text": "custom"}]}
        }
    }"#;

    #[test]
    fn test_text_properties() {
        assert_eq!(
            extract_property(PAGE, "Name", PropertyKind::Title),
            Value::from("Groceries")
        );
        assert_eq!(
            extract_property(PAGE, "Notes", PropertyKind::RichText),
            Value::Null
        );
    }

    #[test]
    fn test_number_and_checkbox() {
        assert_eq!(
            extract_property(PAGE, "Price", PropertyKind::Number),
            Value::Double(12.5)
        );
        assert_eq!(
            extract_property(PAGE, "Done", PropertyKind::Checkbox),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_select_and_url() {
        assert_eq!(
            extract_property(PAGE, "Stage", PropertyKind::Select),
            Value::from("Doing")
        );
        assert_eq!(
            extract_property(PAGE, "Empty Stage", PropertyKind::Select),
            Value::Null
        );
        assert_eq!(
            extract_property(PAGE, "Link", PropertyKind::Url),
            Value::from("https://example.com")
        );
    }

    #[test]
    fn test_property_named_like_top_level_key() {
        assert_eq!(
            extract_property(PAGE, "id", PropertyKind::RichText),
            Value::from("custom")
        );
    }

    #[test]
    fn test_missing_property_or_wrong_kind_is_null() {
        assert_eq!(
            extract_property(PAGE, "Nope", PropertyKind::Title),
            Value::Null
        );
        assert_eq!(
            extract_property(PAGE, "Link", PropertyKind::Number),
            Value::Null
        );
    }
}
