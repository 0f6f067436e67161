//! Table introspector trait definition

use crate::types::ColumnRow;
use async_trait::async_trait;
use cdcs_core::Result;

/// Source of table and column metadata.
///
/// Implementations must return columns in table-definition order.
#[async_trait]
pub trait TableIntrospector: Send + Sync {
    /// Base tables of `database`, sorted by name.
    async fn list_tables(&self, database: &str) -> Result<Vec<String>>;

    /// Columns of `database.table` in ordinal order.
    async fn describe_table(&self, database: &str, table: &str) -> Result<Vec<ColumnRow>>;
}

/// `database.table`, the form used in logs and error messages
pub fn qualified_name(database: &str, table: &str) -> String {
    format!("{}.{}", database, table)
}
