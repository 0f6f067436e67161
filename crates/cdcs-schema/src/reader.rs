//! Reading column definitions back from schema files
//!
//! Documents written by the change-stream router start with a block of
//! metadata fields before the table columns; that block is skipped. A table
//! column that merely shares a metadata name is kept. Missing `real_type`
//! or `length` values are tolerated so that hand-written or older files
//! still load.

use crate::types::NO_LENGTH;
use cdcs_core::{Error, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// Fields the change-stream router puts in front of every record's columns
pub const GENERATED_FIELDS: &[&str] = &[
    "domain",
    "server_id",
    "sequence",
    "event_number",
    "event_type",
    "timestamp",
];

/// `real_type` used when a field does not declare one
pub const UNKNOWN_REAL_TYPE: &str = "unknown";

/// A table column as recorded in a schema file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub real_type: String,
    pub length: i32,
}

pub fn is_generated_field(name: &str) -> bool {
    GENERATED_FIELDS.contains(&name)
}

/// Length of the router's metadata block at the start of `fields`, or 0
/// when the document does not carry one.
fn generated_prefix_len(fields: &[Value]) -> usize {
    let leading: BTreeSet<&str> = fields
        .iter()
        .take(GENERATED_FIELDS.len())
        .map_while(|field| field.get("name").and_then(Value::as_str))
        .filter(|name| is_generated_field(name))
        .collect();

    if leading.len() == GENERATED_FIELDS.len() {
        leading.len()
    } else {
        0
    }
}

/// Extract the table columns of a schema document, in document order
pub fn read_column_definitions(json: &str) -> Result<Vec<ColumnDefinition>> {
    let document: Value = serde_json::from_str(json)?;

    let fields = document
        .get("fields")
        .ok_or_else(|| Error::SchemaRead("no 'fields' value in object".to_string()))?
        .as_array()
        .ok_or_else(|| Error::SchemaRead("'fields' is not an array".to_string()))?;

    let skip = generated_prefix_len(fields);
    let mut columns = Vec::with_capacity(fields.len() - skip);

    for field in &fields[skip..] {
        let field = field.as_object().ok_or_else(|| {
            Error::SchemaRead("'fields' is not an array of objects".to_string())
        })?;

        let name = field
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::SchemaRead("field 'name' is not a string".to_string()))?;

        let real_type = match field.get("real_type").and_then(Value::as_str) {
            Some(t) => t.to_string(),
            None => {
                tracing::warn!(
                    field = %name,
                    "No \"real_type\" value defined, treating as unknown type"
                );
                UNKNOWN_REAL_TYPE.to_string()
            }
        };

        let length = match field
            .get("length")
            .and_then(Value::as_i64)
            .and_then(|l| i32::try_from(l).ok())
        {
            Some(l) => l,
            None => {
                tracing::warn!(field = %name, "No \"length\" value defined, using default length");
                NO_LENGTH
            }
        };

        columns.push(ColumnDefinition {
            name: name.to_string(),
            real_type,
            length,
        });
    }

    Ok(columns)
}

/// [`read_column_definitions`] on the contents of a file
pub fn read_column_definitions_from_file(path: &Path) -> Result<Vec<ColumnDefinition>> {
    let contents = std::fs::read_to_string(path)?;
    read_column_definitions(&contents).map_err(|e| match e {
        Error::SchemaRead(msg) => Error::SchemaRead(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}
