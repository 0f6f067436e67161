//! Core types shared by the cdc_schema crates
//!
//! This crate provides the common error type and the configuration model
//! used by the introspection, storage and export layers.

pub mod config;
pub mod error;

// Re-exports
pub use config::{CdcsConfig, ConnectionConfig, OutputConfig, SchemaConfig};
pub use error::{Error, Result};
