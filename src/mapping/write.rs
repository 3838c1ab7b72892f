// src/mapping/write.rs
//! Typed row → Notion `properties` JSON.

use crate::json::escape;
use crate::types::{LogicalType, PropertyName, Value};

/// Builds the `properties` object for one row.
///
/// Columns are taken positionally. The first text column is the page title,
/// every other text column is rich text. Types with no Notion counterpart
/// are stringified into rich text. A null title becomes an empty title
/// array; any other null becomes JSON `null`.
pub fn row_to_properties(
    column_names: &[PropertyName],
    column_types: &[LogicalType],
    row: &[Value],
) -> String {
    let members: Vec<String> = column_names
        .iter()
        .zip(column_types)
        .zip(row)
        .enumerate()
        .map(|(index, ((name, ty), value))| {
            format!(
                "\"{}\":{}",
                escape(name.as_str()),
                property_value(index, ty, value)
            )
        })
        .collect();

    format!("{{{}}}", members.join(","))
}

fn property_value(index: usize, ty: &LogicalType, value: &Value) -> String {
    if value.is_null() {
        return if index == 0 {
            "{\"title\":[]}".to_string()
        } else {
            "null".to_string()
        };
    }

    match ty {
        ty if ty.is_numeric() => match numeric_literal(value) {
            Some(number) => format!("{{\"number\":{}}}", number),
            None => "{\"number\":null}".to_string(),
        },
        LogicalType::Boolean => format!("{{\"checkbox\":{}}}", is_checked(value)),
        _ => text_value(index, &value.to_string()),
    }
}

fn text_value(index: usize, content: &str) -> String {
    let kind = if index == 0 { "title" } else { "rich_text" };
    format!(
        "{{\"{}\":[{{\"text\":{{\"content\":\"{}\"}}}}]}}",
        kind,
        escape(content)
    )
}

/// JSON number text for a value, if it has one.
fn numeric_literal(value: &Value) -> Option<String> {
    match value {
        Value::Integer(v) => Some(v.to_string()),
        Value::BigInt(v) => Some(v.to_string()),
        Value::Float(v) if v.is_finite() => Some(v.to_string()),
        Value::Double(v) if v.is_finite() => Some(v.to_string()),
        Value::Varchar(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.to_string())
        }
        _ => None,
    }
}

fn is_checked(value: &Value) -> bool {
    match value {
        Value::Boolean(b) => *b,
        other => matches!(
            Value::parse_as(&other.to_string(), &LogicalType::Boolean),
            Ok(Value::Boolean(true))
        ),
    }
}
