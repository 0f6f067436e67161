//! Shared types for table introspection

use serde::{Deserialize, Serialize};

/// One row of a describe-table result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRow {
    pub name: String,
    /// Full native type, e.g. `varchar(255)` or `int(10) unsigned`
    pub native_type: String,
    pub nullable: bool,
    pub key: String,
    pub default_value: Option<String>,
    pub extra: String,
}

impl ColumnRow {
    /// A nullable column with no key, default or extra attributes
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            nullable: true,
            key: String::new(),
            default_value: None,
            extra: String::new(),
        }
    }

    /// The two attributes schema generation uses
    pub fn name_and_type(&self) -> (&str, &str) {
        (&self.name, &self.native_type)
    }
}
