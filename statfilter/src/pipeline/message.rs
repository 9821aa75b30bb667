//! Event message model
//!
//! A message carries four string headers (`logger`, `hostname`, `type`,
//! `payload`) and an ordered list of typed, multi-valued fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured event message flowing through the pipeline
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Message {
    #[serde(default)]
    pub logger: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default, rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Message {
    pub fn logger(&self) -> &str {
        &self.logger
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn message_type(&self) -> &str {
        &self.type_
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// First field with the given name, if any
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Field value type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Bytes,
    Integer,
    Double,
    Bool,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Bytes => write!(f, "bytes"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Double => write!(f, "double"),
            FieldType::Bool => write!(f, "bool"),
        }
    }
}

/// Field values, one variant per value type
///
/// Serialized externally tagged: `{"string": ["a", "b"]}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValue {
    String(Vec<String>),
    Bytes(Vec<Vec<u8>>),
    Integer(Vec<i64>),
    Double(Vec<f64>),
    Bool(Vec<bool>),
}

/// Named message field
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representation: Option<String>,
}

impl Field {
    /// Create a string-typed field with a single value
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::String(vec![value.into()]),
            representation: None,
        }
    }

    pub fn value_type(&self) -> FieldType {
        match self.value {
            FieldValue::String(_) => FieldType::String,
            FieldValue::Bytes(_) => FieldType::Bytes,
            FieldValue::Integer(_) => FieldType::Integer,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::Bool(_) => FieldType::Bool,
        }
    }

    /// String values; empty for non-string fields
    pub fn value_strings(&self) -> &[String] {
        match &self.value {
            FieldValue::String(values) => values,
            _ => &[],
        }
    }
}
