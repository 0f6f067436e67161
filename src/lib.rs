//! cdc_schema: generate change-record schema files from MySQL tables
//!
//! The workspace is split into:
//! - `cdcs-core`: configuration and the shared error type
//! - `cdcs-schema`: type classification and schema assembly
//! - `cdcs-introspect`: listing and describing tables
//! - `cdcs-store`: writing `<db>.<table>.<version>.avsc` files
//! - `cdcs-telemetry`: logging and tracing setup
//!
//! This crate ties them together in [`export::Exporter`].

pub mod export;

pub use cdcs_core::{CdcsConfig, Error, Result};
pub use cdcs_introspect::{ColumnRow, InMemoryIntrospector, MySqlIntrospector, TableIntrospector};
pub use cdcs_schema::{
    DiagnosticSink, FieldDescriptor, LogicalType, SchemaAssembler, SchemaDocument, TracingSink,
};
pub use cdcs_store::{FileSystemSchemaStore, InMemorySchemaStore, SaveOutcome, SchemaStore};
pub use export::{ExportReport, Exporter, TableOutcome, TableReport};
