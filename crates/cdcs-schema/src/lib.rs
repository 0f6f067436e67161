//! Schema generation for change-data-capture consumers
//!
//! Maps native column types reported by a describe-table call to the small
//! set of logical types used by change records, and assembles the columns of
//! one table into a record schema document.
//!
//! ```
//! use cdcs_schema::{assemble_default, LogicalType, NoopSink};
//!
//! let doc = assemble_default([("id", "int(11)"), ("name", "varchar(50)")], &NoopSink);
//! assert_eq!(doc.fields[0].logical_type, LogicalType::Int);
//! assert_eq!(doc.fields[1].length, 50);
//! ```

pub mod assembler;
pub mod classifier;
pub mod diagnostics;
pub mod reader;
pub mod types;

// Re-exports
pub use assembler::{SchemaAssembler, assemble, assemble_default};
pub use classifier::{Classification, classify, classify_field, extract_length, strip_qualifier};
pub use diagnostics::{
    CountingSink, DiagnosticSink, NoopSink, RecordingSink, TracingSink, UnrecognizedType,
};
pub use reader::{ColumnDefinition, read_column_definitions, read_column_definitions_from_file};
pub use types::{FieldDescriptor, LogicalType, NO_LENGTH, RECORD_TYPE, SchemaDocument};
