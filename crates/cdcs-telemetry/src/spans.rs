//! Span creation helpers for table exports

use crate::attributes::*;

/// Attributes for tracing the export of one table
#[derive(Debug, Clone)]
pub struct TableExportSpanAttributes {
    pub database: String,
    pub table: String,
    pub schema_file: String,
    pub field_count: usize,
    pub unrecognized_count: usize,
    /// `written`, `skipped` or `failed`
    pub outcome: String,
}

/// Record one exported table as an `export_table` span with a summary event.
pub fn trace_table_export(attrs: TableExportSpanAttributes) {
    let span = tracing::info_span!(
        "export_table",
        { DB_SYSTEM } = DB_SYSTEM_MYSQL,
        { DB_NAMESPACE } = %attrs.database,
        { DB_COLLECTION_NAME } = %attrs.table,
        { CDCS_SCHEMA_FILE } = %attrs.schema_file,
        { CDCS_FIELD_COUNT } = attrs.field_count,
        { CDCS_UNRECOGNIZED_COUNT } = attrs.unrecognized_count,
        { CDCS_OUTCOME } = %attrs.outcome,
    );

    let _guard = span.enter();
    tracing::info!("Table {}.{} {}", attrs.database, attrs.table, attrs.outcome);
}
