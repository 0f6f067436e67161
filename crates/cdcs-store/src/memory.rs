//! In-memory schema store implementation

use crate::*;
use async_trait::async_trait;
use cdcs_schema::SchemaDocument;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// In-memory schema store.
///
/// Primarily for tests. Data is not persisted across restarts.
#[derive(Clone)]
pub struct InMemorySchemaStore {
    schemas: Arc<RwLock<BTreeMap<SchemaFileName, SchemaDocument>>>,
    overwrite: bool,
}

impl InMemorySchemaStore {
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(BTreeMap::new())),
            overwrite: false,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Names of every stored schema, sorted
    pub fn names(&self) -> Vec<SchemaFileName> {
        self.schemas.read().unwrap().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaStore for InMemorySchemaStore {
    async fn save(&self, name: &SchemaFileName, document: &SchemaDocument) -> Result<SaveOutcome> {
        name.validate()?;

        let mut schemas = self.schemas.write().unwrap();
        if !self.overwrite && schemas.contains_key(name) {
            return Ok(SaveOutcome::Skipped);
        }
        schemas.insert(name.clone(), document.clone());
        Ok(SaveOutcome::Written)
    }

    async fn load(&self, name: &SchemaFileName) -> Result<SchemaDocument> {
        self.schemas
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn versions(&self, database: &str, table: &str) -> Result<Vec<u32>> {
        let schemas = self.schemas.read().unwrap();
        Ok(schemas
            .keys()
            .filter(|name| name.database == database && name.table == table)
            .map(|name| name.version)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_skip_and_overwrite() {
        let name = SchemaFileName::initial("shop", "orders");
        let first = SchemaDocument::new("ns", "A");
        let second = SchemaDocument::new("ns", "B");

        let store = InMemorySchemaStore::new();
        assert_eq!(store.save(&name, &first).await.unwrap(), SaveOutcome::Written);
        assert_eq!(store.save(&name, &second).await.unwrap(), SaveOutcome::Skipped);
        assert_eq!(store.load(&name).await.unwrap().record_name, "A");

        let store = InMemorySchemaStore::new().with_overwrite(true);
        store.save(&name, &first).await.unwrap();
        assert_eq!(store.save(&name, &second).await.unwrap(), SaveOutcome::Written);
        assert_eq!(store.load(&name).await.unwrap().record_name, "B");
    }

    #[tokio::test]
    async fn test_versions_are_sorted() {
        let store = InMemorySchemaStore::new();
        let doc = SchemaDocument::new("ns", "R");
        for version in [2, 1] {
            store
                .save(&SchemaFileName::new("shop", "orders", version), &doc)
                .await
                .unwrap();
        }
        assert_eq!(store.versions("shop", "orders").await.unwrap(), vec![1, 2]);
        assert_eq!(store.len(), 2);
    }
}
