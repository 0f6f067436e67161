//! In-memory introspector implementation

use crate::introspector::{TableIntrospector, qualified_name};
use crate::types::ColumnRow;
use async_trait::async_trait;
use cdcs_core::{Error, Result};
use std::collections::BTreeMap;

/// Introspector serving fixed table definitions.
///
/// Useful for tests and for generating schemas from definitions obtained
/// elsewhere. Columns keep the order in which they were added.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIntrospector {
    databases: BTreeMap<String, BTreeMap<String, Vec<ColumnRow>>>,
}

impl InMemoryIntrospector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a table definition
    pub fn with_table(
        mut self,
        database: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<ColumnRow>,
    ) -> Self {
        self.add_table(database, table, columns);
        self
    }

    pub fn add_table(
        &mut self,
        database: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<ColumnRow>,
    ) {
        self.databases
            .entry(database.into())
            .or_default()
            .insert(table.into(), columns);
    }
}

#[async_trait]
impl TableIntrospector for InMemoryIntrospector {
    async fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        let tables = self.databases.get(database).ok_or_else(|| {
            Error::introspection(database, anyhow::anyhow!("unknown database"))
        })?;
        Ok(tables.keys().cloned().collect())
    }

    async fn describe_table(&self, database: &str, table: &str) -> Result<Vec<ColumnRow>> {
        self.databases
            .get(database)
            .and_then(|tables| tables.get(table))
            .cloned()
            .ok_or_else(|| {
                Error::introspection(
                    qualified_name(database, table),
                    anyhow::anyhow!("table does not exist"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn introspector() -> InMemoryIntrospector {
        InMemoryIntrospector::new()
            .with_table(
                "shop",
                "orders",
                vec![
                    ColumnRow::new("id", "int(11)"),
                    ColumnRow::new("customer", "varchar(64)"),
                    ColumnRow::new("amount", "decimal(10,2)"),
                ],
            )
            .with_table("shop", "customers", vec![ColumnRow::new("id", "bigint")])
            .with_table("shop", "empty", Vec::new())
    }

    #[tokio::test]
    async fn test_list_tables_sorted() {
        let tables = introspector().list_tables("shop").await.unwrap();
        assert_eq!(tables, vec!["customers", "empty", "orders"]);
    }

    #[tokio::test]
    async fn test_describe_keeps_column_order() {
        let columns = introspector().describe_table("shop", "orders").await.unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name_and_type().0).collect();
        assert_eq!(names, vec!["id", "customer", "amount"]);
    }

    #[tokio::test]
    async fn test_empty_table_is_not_an_error() {
        let columns = introspector().describe_table("shop", "empty").await.unwrap();
        assert!(columns.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_objects() {
        let err = introspector().list_tables("nope").await.unwrap_err();
        assert!(err.to_string().contains("nope"));

        let err = introspector()
            .describe_table("shop", "missing")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("shop.missing"));
    }
}
