//! # cdc_schema telemetry
//!
//! Logging setup for the schema export tool.
//!
//! Every exported table is recorded as one `export_table` span carrying the
//! database, table, output file and field statistics, using OpenTelemetry
//! database semantic conventions for the attribute names where they exist.

mod spans;
mod tracer;

pub use spans::{TableExportSpanAttributes, trace_table_export};
pub use tracer::{LogFormat, TelemetryOptions, init_telemetry};

/// OpenTelemetry span attribute constants for schema export.
pub mod attributes {
    // Database semantic conventions
    pub const DB_SYSTEM: &str = "db.system";
    pub const DB_NAMESPACE: &str = "db.namespace";
    pub const DB_COLLECTION_NAME: &str = "db.collection.name";

    // Export attributes
    pub const CDCS_SCHEMA_FILE: &str = "cdcs.schema.file";
    pub const CDCS_FIELD_COUNT: &str = "cdcs.schema.field_count";
    pub const CDCS_UNRECOGNIZED_COUNT: &str = "cdcs.schema.unrecognized_count";
    pub const CDCS_OUTCOME: &str = "cdcs.export.outcome";

    pub const DB_SYSTEM_MYSQL: &str = "mysql";
}
