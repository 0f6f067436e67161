//! MySQL / MariaDB introspection over information_schema

use crate::introspector::{TableIntrospector, qualified_name};
use crate::types::ColumnRow;
use async_trait::async_trait;
use cdcs_core::{ConnectionConfig, Error, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};
use std::time::Duration;

const LIST_TABLES_QUERY: &str = r#"
    SELECT CAST(TABLE_NAME AS CHAR) AS table_name
    FROM information_schema.tables
    WHERE TABLE_SCHEMA = ?
    AND TABLE_TYPE = 'BASE TABLE'
    ORDER BY TABLE_NAME
"#;

const DESCRIBE_TABLE_QUERY: &str = r#"
    SELECT
        CAST(COLUMN_NAME AS CHAR) AS column_name,
        CAST(COLUMN_TYPE AS CHAR) AS column_type,
        CAST(IS_NULLABLE AS CHAR) AS is_nullable,
        CAST(COLUMN_KEY AS CHAR) AS column_key,
        CAST(COLUMN_DEFAULT AS CHAR) AS column_default,
        CAST(EXTRA AS CHAR) AS extra
    FROM information_schema.columns
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION
"#;

/// information_schema.columns row
#[derive(Debug, Clone, sqlx::FromRow)]
struct ColumnRecord {
    column_name: String,
    column_type: String,
    is_nullable: String,
    column_key: Option<String>,
    column_default: Option<String>,
    extra: Option<String>,
}

impl From<ColumnRecord> for ColumnRow {
    fn from(record: ColumnRecord) -> Self {
        Self {
            name: record.column_name,
            native_type: record.column_type,
            nullable: record.is_nullable.eq_ignore_ascii_case("YES"),
            key: record.column_key.unwrap_or_default(),
            default_value: record.column_default,
            extra: record.extra.unwrap_or_default(),
        }
    }
}

/// Introspector backed by a MySQL connection pool
pub struct MySqlIntrospector {
    pool: Pool<MySql>,
}

impl MySqlIntrospector {
    /// Connect to the server described by `config`
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| {
                Error::Connection(format!(
                    "Failed to connect to {}:{}: {}",
                    config.host, config.port, e
                ))
            })?;

        tracing::debug!(host = %config.host, port = config.port, "Connected to source server");

        Ok(Self { pool })
    }

    /// Create from an existing pool
    pub fn from_pool(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TableIntrospector for MySqlIntrospector {
    async fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        tracing::debug!(database = %database, "Listing tables");

        let tables: Vec<(String,)> = sqlx::query_as(LIST_TABLES_QUERY)
            .bind(database)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::introspection(database, e))?;

        Ok(tables.into_iter().map(|(name,)| name).collect())
    }

    async fn describe_table(&self, database: &str, table: &str) -> Result<Vec<ColumnRow>> {
        let object = qualified_name(database, table);
        tracing::debug!(table = %object, "Describing table");

        let records: Vec<ColumnRecord> = sqlx::query_as(DESCRIBE_TABLE_QUERY)
            .bind(database)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::introspection(object.as_str(), e))?;

        // A table always has at least one column, so nothing here means it is gone
        if records.is_empty() {
            return Err(Error::introspection(
                object,
                anyhow::anyhow!("table does not exist"),
            ));
        }

        Ok(records.into_iter().map(ColumnRow::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(nullable: &str) -> ColumnRecord {
        ColumnRecord {
            column_name: "Price".to_string(),
            column_type: "decimal(10,2)".to_string(),
            is_nullable: nullable.to_string(),
            column_key: None,
            column_default: Some("0.00".to_string()),
            extra: None,
        }
    }

    #[test]
    fn test_record_conversion() {
        let row = ColumnRow::from(record("YES"));
        assert_eq!(row.name, "Price");
        assert_eq!(row.native_type, "decimal(10,2)");
        assert!(row.nullable);
        assert_eq!(row.key, "");
        assert_eq!(row.default_value.as_deref(), Some("0.00"));
        assert_eq!(row.extra, "");

        assert!(!ColumnRow::from(record("NO")).nullable);
    }

    #[test]
    fn test_queries_are_parameterized() {
        assert_eq!(LIST_TABLES_QUERY.matches('?').count(), 1);
        assert_eq!(DESCRIBE_TABLE_QUERY.matches('?').count(), 2);
        assert!(DESCRIBE_TABLE_QUERY.contains("ORDER BY ORDINAL_POSITION"));
    }
}
