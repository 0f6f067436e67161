//! Table introspection for cdc_schema
//!
//! Lists the tables of a database and describes their columns in
//! table-definition order. The MySQL implementation reads
//! `information_schema`; the in-memory one serves fixed definitions.

mod inmemory;
pub mod introspector;
pub mod mysql;
pub mod types;

// Re-exports
pub use inmemory::InMemoryIntrospector;
pub use introspector::{TableIntrospector, qualified_name};
pub use mysql::MySqlIntrospector;
pub use types::ColumnRow;
