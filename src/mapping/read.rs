// src/mapping/read.rs
//! Page object → output row.

use crate::constants::READ_COLUMNS;
use crate::json::{extract_members, extract_property, find_string};
use crate::types::{LogicalType, PropertyKind, Row, Value};

/// Where a read column takes its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    Id,
    /// Not populated yet: always the empty string.
    Title,
    CreatedTime,
    LastEditedTime,
    Property { name: String, kind: PropertyKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadColumn {
    pub name: String,
    pub logical_type: LogicalType,
    pub source: ColumnSource,
}

/// Output schema of a table read.
///
/// Always starts with `id, title, created_time, last_edited_time`, all
/// VARCHAR, regardless of what the remote database defines. Extra property
/// columns are only present when asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadSchema {
    columns: Vec<ReadColumn>,
}

impl ReadSchema {
    pub fn fixed() -> Self {
        let sources = [
            ColumnSource::Id,
            ColumnSource::Title,
            ColumnSource::CreatedTime,
            ColumnSource::LastEditedTime,
        ];
        let columns = READ_COLUMNS
            .iter()
            .zip(sources)
            .map(|(name, source)| ReadColumn {
                name: name.to_string(),
                logical_type: LogicalType::Varchar,
                source,
            })
            .collect();
        Self { columns }
    }

    /// Appends a column read from property `name` as `kind`.
    pub fn with_property(mut self, name: impl Into<String>, kind: PropertyKind) -> Self {
        let name = name.into();
        self.columns.push(ReadColumn {
            name: name.clone(),
            logical_type: kind.logical_type(),
            source: ColumnSource::Property { name, kind },
        });
        self
    }

    pub fn columns(&self) -> &[ReadColumn] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn types(&self) -> Vec<LogicalType> {
        self.columns.iter().map(|c| c.logical_type.clone()).collect()
    }

    /// Maps one page object fragment to a row of this schema.
    pub fn project(&self, fragment: &str) -> Row {
        self.columns
            .iter()
            .map(|column| match &column.source {
                ColumnSource::Id => scalar(fragment, "id"),
                ColumnSource::Title => Value::Varchar(String::new()),
                ColumnSource::CreatedTime => scalar(fragment, "created_time"),
                ColumnSource::LastEditedTime => scalar(fragment, "last_edited_time"),
                ColumnSource::Property { name, kind } => extract_property(fragment, name, *kind),
            })
            .collect()
    }
}

impl Default for ReadSchema {
    fn default() -> Self {
        Self::fixed()
    }
}

fn scalar(fragment: &str, key: &str) -> Value {
    Value::Varchar(find_string(fragment, key).unwrap_or_default().to_string())
}

/// A property definition found in a schema-fetch response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProperty {
    pub name: String,
    /// Notion's type tag, e.g. `title`, `number`, `multi_select`.
    pub kind: String,
}

impl RemoteProperty {
    /// The mapper's view of this property, if it understands the type.
    pub fn property_kind(&self) -> Option<PropertyKind> {
        self.kind.parse().ok()
    }
}

/// Lists the `properties` map of a database (or data source) response.
pub fn remote_properties(schema_body: &str) -> Vec<RemoteProperty> {
    extract_members(schema_body, "properties")
        .into_iter()
        .map(|(name, definition)| RemoteProperty {
            name: name.to_string(),
            kind: find_string(definition, "type").unwrap_or_default().to_string(),
        })
        .collect()
}
