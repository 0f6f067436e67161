//! Schema document model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of `type` in every generated document
pub const RECORD_TYPE: &str = "record";

/// Length of a field that has no meaningful length
pub const NO_LENGTH: i32 = -1;

/// Canonical type tag of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    String,
    Bytes,
    Int,
    Float,
    Double,
    Null,
    Long,
}

impl LogicalType {
    /// Every tag a document may contain
    pub const ALL: [LogicalType; 7] = [
        LogicalType::String,
        LogicalType::Bytes,
        LogicalType::Int,
        LogicalType::Float,
        LogicalType::Double,
        LogicalType::Null,
        LogicalType::Long,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalType::String => "string",
            LogicalType::Bytes => "bytes",
            LogicalType::Int => "int",
            LogicalType::Float => "float",
            LogicalType::Double => "double",
            LogicalType::Null => "null",
            LogicalType::Long => "long",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a table
///
/// Serialized as `{"name", "type", "real_type", "length"}` in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Column name exactly as reported by the server
    pub name: String,

    #[serde(rename = "type")]
    pub logical_type: LogicalType,

    /// Native type keyword without its parenthesized qualifier
    #[serde(rename = "real_type")]
    pub native_type: String,

    /// Declared length for string columns, [`NO_LENGTH`] otherwise
    pub length: i32,
}

impl FieldDescriptor {
    pub fn has_length(&self) -> bool {
        self.length >= 0
    }
}

/// The schema of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub namespace: String,

    #[serde(rename = "type")]
    pub record_type: String,

    #[serde(rename = "name")]
    pub record_name: String,

    /// Fields in table-definition order
    pub fields: Vec<FieldDescriptor>,
}

impl SchemaDocument {
    /// Create a record document with no fields
    pub fn new(namespace: impl Into<String>, record_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            record_type: RECORD_TYPE.to_string(),
            record_name: record_name.into(),
            fields: Vec::new(),
        }
    }

    /// Compact JSON, the form written to `.avsc` files
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
