// src/types/values.rs
//! Typed row values exchanged with the host engine.
//!
//! Only the scalar kinds the property mapper distinguishes are modelled;
//! anything else travels as [`LogicalType::Other`] and is stringified.

use super::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Declared type of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalType {
    Varchar,
    Integer,
    BigInt,
    Float,
    Double,
    Boolean,
    Other(String),
}

impl LogicalType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Integer | Self::BigInt | Self::Float | Self::Double
        )
    }
}

impl FromStr for LogicalType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ValidationError::UnknownType(s.to_string()));
        }
        Ok(match name.to_ascii_uppercase().as_str() {
            "VARCHAR" | "TEXT" | "STRING" => Self::Varchar,
            "INTEGER" | "INT" | "INT4" => Self::Integer,
            "BIGINT" | "INT8" | "LONG" => Self::BigInt,
            "FLOAT" | "REAL" | "FLOAT4" => Self::Float,
            "DOUBLE" | "FLOAT8" => Self::Double,
            "BOOLEAN" | "BOOL" => Self::Boolean,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Varchar => write!(f, "VARCHAR"),
            Self::Integer => write!(f, "INTEGER"),
            Self::BigInt => write!(f, "BIGINT"),
            Self::Float => write!(f, "FLOAT"),
            Self::Double => write!(f, "DOUBLE"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// One cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Varchar(String),
    Integer(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Parses text into a value of the declared type. `\N` is null.
    pub fn parse_as(text: &str, ty: &LogicalType) -> Result<Self, ValidationError> {
        if text == "\\N" {
            return Ok(Self::Null);
        }

        let invalid = |expected: &'static str| ValidationError::InvalidValue {
            value: text.to_string(),
            expected,
        };

        Ok(match ty {
            LogicalType::Varchar | LogicalType::Other(_) => Self::Varchar(text.to_string()),
            LogicalType::Integer => {
                Self::Integer(text.trim().parse().map_err(|_| invalid("INTEGER"))?)
            }
            LogicalType::BigInt => Self::BigInt(text.trim().parse().map_err(|_| invalid("BIGINT"))?),
            LogicalType::Float => Self::Float(text.trim().parse().map_err(|_| invalid("FLOAT"))?),
            LogicalType::Double => Self::Double(text.trim().parse().map_err(|_| invalid("DOUBLE"))?),
            LogicalType::Boolean => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "1" | "yes" => Self::Boolean(true),
                "false" | "f" | "0" | "no" => Self::Boolean(false),
                _ => return Err(invalid("BOOLEAN")),
            },
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Varchar(s) => write!(f, "{}", s),
            Self::Integer(v) => write!(f, "{}", v),
            Self::BigInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Boolean(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Varchar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Varchar(s)
    }
}

impl From<Option<String>> for Value {
    fn from(s: Option<String>) -> Self {
        s.map(Self::Varchar).unwrap_or(Self::Null)
    }
}

/// One output or input row, positional.
pub type Row = Vec<Value>;

/// A batch of rows sharing one column layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataChunk {
    pub types: Vec<LogicalType>,
    pub rows: Vec<Row>,
}

impl DataChunk {
    pub fn new(types: Vec<LogicalType>) -> Self {
        Self {
            types,
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn column_count(&self) -> usize {
        self.types.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Notion property shapes understood by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Title,
    RichText,
    Number,
    Checkbox,
    Select,
    Url,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::Url => "url",
        }
    }

    /// Column type a read of this property produces.
    pub fn logical_type(&self) -> LogicalType {
        match self {
            Self::Number => LogicalType::Double,
            Self::Checkbox => LogicalType::Boolean,
            Self::Title | Self::RichText | Self::Select | Self::Url => LogicalType::Varchar,
        }
    }
}

impl FromStr for PropertyKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "title" => Ok(Self::Title),
            "rich_text" => Ok(Self::RichText),
            "number" => Ok(Self::Number),
            "checkbox" => Ok(Self::Checkbox),
            "select" => Ok(Self::Select),
            "url" => Ok(Self::Url),
            other => Err(ValidationError::UnknownPropertyKind(other.to_string())),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
