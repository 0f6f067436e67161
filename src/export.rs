//! Export of table schemas from an introspector into a schema store

use cdcs_core::Result;
use cdcs_introspect::{TableIntrospector, qualified_name};
use cdcs_schema::{CountingSink, SchemaAssembler};
use cdcs_store::{INITIAL_VERSION, SaveOutcome, SchemaFileName, SchemaStore};
use cdcs_telemetry::{TableExportSpanAttributes, trace_table_export};
use futures::stream::{self, StreamExt};
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

/// What happened to one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    Written,
    /// The schema file already existed
    Skipped,
    Failed(String),
}

impl fmt::Display for TableOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableOutcome::Written => f.write_str("written"),
            TableOutcome::Skipped => f.write_str("skipped"),
            TableOutcome::Failed(_) => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub database: String,
    pub table: String,
    pub file_name: String,
    pub outcome: TableOutcome,
    pub field_count: usize,
    pub unrecognized_count: usize,
}

/// A database whose tables could not be listed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseFailure {
    pub database: String,
    pub error: String,
}

/// Result of an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub tables: Vec<TableReport>,
    pub failed_databases: Vec<DatabaseFailure>,
}

impl ExportReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, TableOutcome::Written))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TableOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TableOutcome::Failed(_)))
    }

    pub fn unrecognized(&self) -> usize {
        self.tables.iter().map(|t| t.unrecognized_count).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0 || !self.failed_databases.is_empty()
    }

    fn count(&self, predicate: impl Fn(&TableOutcome) -> bool) -> usize {
        self.tables.iter().filter(|t| predicate(&t.outcome)).count()
    }
}

/// Drives introspection, assembly and storage of table schemas
pub struct Exporter {
    introspector: Arc<dyn TableIntrospector>,
    store: Arc<dyn SchemaStore>,
    assembler: SchemaAssembler,
    concurrency: usize,
    version: u32,
}

impl Exporter {
    pub fn new(
        introspector: Arc<dyn TableIntrospector>,
        store: Arc<dyn SchemaStore>,
        assembler: SchemaAssembler,
    ) -> Self {
        Self {
            introspector,
            store,
            assembler,
            concurrency: 1,
            version: INITIAL_VERSION,
        }
    }

    /// Number of tables of one database exported at the same time
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Version written into the schema file names
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Export every database in turn
    pub async fn export_all<S: AsRef<str>>(&self, databases: &[S]) -> ExportReport {
        let mut report = ExportReport::default();

        for database in databases {
            let database = database.as_ref();
            match self.export_database(database).await {
                Ok(tables) => report.tables.extend(tables),
                Err(e) => {
                    tracing::error!(database = %database, "Failed to list tables: {}", e);
                    report.failed_databases.push(DatabaseFailure {
                        database: database.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }

    /// Export all base tables of one database.
    ///
    /// Only listing the tables can fail here; per-table failures are
    /// recorded in the returned reports.
    pub async fn export_database(&self, database: &str) -> Result<Vec<TableReport>> {
        let tables = self.introspector.list_tables(database).await?;
        tracing::info!(database = %database, tables = tables.len(), "Exporting database");

        let mut reports: Vec<TableReport> = stream::iter(tables)
            .map(|table| async move { self.export_table_report(database, &table).await })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        reports.sort_by(|a, b| a.table.cmp(&b.table));
        Ok(reports)
    }

    /// Export one table, turning errors into a `Failed` report
    pub async fn export_table_report(&self, database: &str, table: &str) -> TableReport {
        let span = tracing::info_span!("table", table = %qualified_name(database, table));

        let report = match self.export_table(database, table).instrument(span).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(
                    table = %qualified_name(database, table),
                    "Failed to export table: {}",
                    e
                );
                TableReport {
                    database: database.to_string(),
                    table: table.to_string(),
                    file_name: self.file_name(database, table).to_string(),
                    outcome: TableOutcome::Failed(e.to_string()),
                    field_count: 0,
                    unrecognized_count: 0,
                }
            }
        };

        trace_table_export(TableExportSpanAttributes {
            database: report.database.clone(),
            table: report.table.clone(),
            schema_file: report.file_name.clone(),
            field_count: report.field_count,
            unrecognized_count: report.unrecognized_count,
            outcome: report.outcome.to_string(),
        });

        report
    }

    /// Describe, assemble and store the schema of one table
    pub async fn export_table(&self, database: &str, table: &str) -> Result<TableReport> {
        let columns = self.introspector.describe_table(database, table).await?;

        let counter = CountingSink::new(self.assembler.sink());
        let document = self
            .assembler
            .assemble_with_sink(columns.iter().map(|c| c.name_and_type()), &counter);
        let unrecognized_count = counter.count();

        if tracing::enabled!(tracing::Level::DEBUG) {
            let json = document.to_json_pretty()?;
            tracing::debug!("Assembled schema:\n{}", json);
        }

        let name = self.file_name(database, table);
        let outcome = match self.store.save(&name, &document).await? {
            SaveOutcome::Written => {
                tracing::info!(file = %name, fields = document.fields.len(), "Wrote schema");
                TableOutcome::Written
            }
            SaveOutcome::Skipped => TableOutcome::Skipped,
        };

        Ok(TableReport {
            database: database.to_string(),
            table: table.to_string(),
            file_name: name.to_string(),
            outcome,
            field_count: document.fields.len(),
            unrecognized_count,
        })
    }

    fn file_name(&self, database: &str, table: &str) -> SchemaFileName {
        SchemaFileName::new(database, table, self.version)
    }
}
