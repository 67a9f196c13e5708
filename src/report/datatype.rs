use std::fmt::Display;

use serde::Serialize;

use super::printf::FormatSpec;
use crate::error::{ReportError, Result};

/// The closed set of value categories a column can be declared with.
///
/// [`DataType::Unknown`] is never the classification of a value. It marks a
/// column that has no type constraint, so it accepts every kind of [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    Integer,
    Decimal,
    Character,
    String,
    Unknown,
}

impl DataType {
    pub fn from_format(format: &FormatSpec) -> DataType {
        //! Derive the declared type of a column from its format specifier.
        //!
        //! Only bare `%d`, `%c` and `%s` lock a column to Integer, Character
        //! and String. Any specifier ending in a floating conversion (`%.2f`,
        //! `%10.3e`) locks it to Decimal. Everything else, the empty format
        //! included, leaves the column Unknown.

        let raw = format.as_str();
        if raw.is_empty() {
            return DataType::Unknown;
        }

        match raw {
            "%d" | "%D" => DataType::Integer,
            "%c" | "%C" => DataType::Character,
            "%s" | "%S" => DataType::String,
            _ if raw.starts_with('%') && raw.ends_with(['e', 'E', 'f', 'F']) => DataType::Decimal,
            _ => DataType::Unknown,
        }
    }

    pub fn try_parse(self, text: &str) -> Option<Value> {
        //! Coerce `text` into a value of this type.
        //!
        //! Returns `None` when the text does not parse, or when this type has
        //! no textual coercion (String and Unknown).

        match self {
            DataType::Integer => text.parse::<i64>().ok().map(Value::Integer),
            DataType::Decimal => text.parse::<f64>().ok().map(Value::Decimal),
            DataType::Character => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Character(c)),
                    _ => None,
                }
            }
            DataType::String | DataType::Unknown => None,
        }
    }

    pub fn parse_or_keep(self, text: &str) -> Value {
        //! Lenient coercion: the parsed value, or the original text unchanged.

        self.try_parse(text)
            .unwrap_or_else(|| Value::String(text.to_string()))
    }

    pub fn parse_strict(self, text: &str) -> Result<Value> {
        //! Strict coercion: the parsed value, or a [`ReportError::Coercion`]
        //! when a typed column cannot represent the text.

        match self {
            DataType::String | DataType::Unknown => Ok(Value::String(text.to_string())),
            _ => self.try_parse(text).ok_or_else(|| ReportError::Coercion {
                text: text.to_string(),
                target: self,
            }),
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let datatype = match self {
            DataType::Integer => "Integer",
            DataType::Decimal => "Decimal",
            DataType::Character => "Character",
            DataType::String => "String",
            DataType::Unknown => "Unknown",
        };
        write!(f, "{}", datatype)
    }
}

/// A single stored cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
    Character(char),
    String(String),
}

impl Value {
    pub fn classify(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Decimal(_) => DataType::Decimal,
            Value::Character(_) => DataType::Character,
            Value::String(_) => DataType::String,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Decimal(value) => write!(f, "{}", value),
            Value::Character(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Value {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Decimal(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Value {
        Value::Decimal(value.into())
    }
}

impl From<char> for Value {
    fn from(value: char) -> Value {
        Value::Character(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}
