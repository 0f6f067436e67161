//! Schema store trait definition and file naming

use crate::{Result, StoreError};
use async_trait::async_trait;
use cdcs_schema::SchemaDocument;
use std::fmt;

/// Version given to schemas generated from a live table
pub const INITIAL_VERSION: u32 = 1;

/// File extension of schema documents
pub const SCHEMA_EXTENSION: &str = "avsc";

/// Identity of one stored schema: `<database>.<table>.<version:06>.avsc`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaFileName {
    pub database: String,
    pub table: String,
    pub version: u32,
}

impl SchemaFileName {
    pub fn new(database: impl Into<String>, table: impl Into<String>, version: u32) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            version,
        }
    }

    /// Name of the first schema version of a table
    pub fn initial(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self::new(database, table, INITIAL_VERSION)
    }

    /// Parse a file name produced by the `Display` implementation.
    ///
    /// The database part ends at the first dot, so only table names may
    /// contain dots.
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(SCHEMA_EXTENSION)?.strip_suffix('.')?;
        let (qualified, version) = stem.rsplit_once('.')?;
        if version.len() < 6 || !version.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let version = version.parse().ok()?;
        let (database, table) = qualified.split_once('.')?;
        if database.is_empty() || table.is_empty() {
            return None;
        }
        Some(Self::new(database, table, version))
    }

    /// Reject components that would escape the output directory
    pub fn validate(&self) -> Result<()> {
        for part in [&self.database, &self.table] {
            if part.is_empty()
                || part == "."
                || part == ".."
                || part.contains(['/', '\\', '\0'])
            {
                return Err(StoreError::InvalidName(part.clone()));
            }
        }
        if self.database.contains('.') {
            return Err(StoreError::InvalidName(self.database.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for SchemaFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{:06}.{}",
            self.database, self.table, self.version, SCHEMA_EXTENSION
        )
    }
}

/// What `save` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// A schema with the same name already existed and was kept
    Skipped,
}

/// Storage for schema documents.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Store a document. Existing documents are kept unless the store
    /// was configured to overwrite them.
    async fn save(&self, name: &SchemaFileName, document: &SchemaDocument) -> Result<SaveOutcome>;

    /// Load a stored document.
    async fn load(&self, name: &SchemaFileName) -> Result<SchemaDocument>;

    /// All stored versions of a table, ascending.
    async fn versions(&self, database: &str, table: &str) -> Result<Vec<u32>>;
}
