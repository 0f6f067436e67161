//! Persistence of generated schema documents
//!
//! Each table's schema is stored as `<database>.<table>.<version>.avsc`,
//! where the version is a six digit, zero padded number. Generated schemas
//! always start at version `000001`.

mod filesystem;
mod memory;
mod service;

pub use filesystem::FileSystemSchemaStore;
pub use memory::InMemorySchemaStore;
pub use service::*;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Existing schema file is not a valid schema document: {0}")]
    Corrupt(String),

    #[error("Invalid schema file name component: {0:?}")]
    InvalidName(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for cdcs_core::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io(e) => cdcs_core::Error::Io(e),
            StoreError::Serialization(e) => cdcs_core::Error::Serialization(e),
            other => cdcs_core::Error::Other(other.into()),
        }
    }
}
