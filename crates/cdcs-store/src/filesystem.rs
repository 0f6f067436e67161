//! File system schema store implementation

use crate::*;
use async_trait::async_trait;
use cdcs_schema::SchemaDocument;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::fs;

/// File system schema store.
///
/// Stores every schema as a file directly inside `base_path`. Documents are
/// written to a temporary file in the same directory and moved into place,
/// so a schema file is either complete or absent.
pub struct FileSystemSchemaStore {
    base_path: PathBuf,
    overwrite: bool,
}

impl FileSystemSchemaStore {
    /// Create a store that keeps existing schema files
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            overwrite: false,
        }
    }

    /// Replace existing schema files instead of keeping them
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path a schema is stored at
    pub fn path_for(&self, name: &SchemaFileName) -> PathBuf {
        self.base_path.join(name.to_string())
    }

    /// An existing file is only kept when it holds a readable document
    async fn keep_existing(&self, name: &SchemaFileName, path: &Path) -> Result<SaveOutcome> {
        let contents = fs::read_to_string(path).await?;
        if SchemaDocument::from_json(contents.trim_end()).is_err() {
            return Err(StoreError::Corrupt(path.display().to_string()));
        }

        tracing::info!(
            "Schema version {} already exists: {}",
            name.version,
            path.display()
        );
        Ok(SaveOutcome::Skipped)
    }
}

/// Write `contents` to a temporary file in `dir` and move it to `target`.
///
/// Returns `false` when `target` exists and `overwrite` is off. The temporary
/// file is removed on every error path.
fn write_atomically(
    dir: &Path,
    target: &Path,
    contents: &[u8],
    overwrite: bool,
) -> io::Result<bool> {
    let mut file = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;

    let persisted = if overwrite {
        file.persist(target)
    } else {
        file.persist_noclobber(target)
    };

    match persisted {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error),
    }
}

#[async_trait]
impl SchemaStore for FileSystemSchemaStore {
    async fn save(&self, name: &SchemaFileName, document: &SchemaDocument) -> Result<SaveOutcome> {
        name.validate()?;

        fs::create_dir_all(&self.base_path).await?;

        let path = self.path_for(name);
        if !self.overwrite && fs::try_exists(&path).await? {
            return self.keep_existing(name, &path).await;
        }

        let mut contents = document.to_json()?;
        contents.push('\n');

        let dir = self.base_path.clone();
        let target = path.clone();
        let overwrite = self.overwrite;
        let written = tokio::task::spawn_blocking(move || {
            write_atomically(&dir, &target, contents.as_bytes(), overwrite)
        })
        .await
        .map_err(io::Error::other)??;

        // Lost a race with another writer of the same file
        if !written {
            return self.keep_existing(name, &path).await;
        }

        tracing::debug!(path = %path.display(), "Wrote schema");

        Ok(SaveOutcome::Written)
    }

    async fn load(&self, name: &SchemaFileName) -> Result<SchemaDocument> {
        name.validate()?;

        let path = self.path_for(name);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(SchemaDocument::from_json(&contents)?)
    }

    async fn versions(&self, database: &str, table: &str) -> Result<Vec<u32>> {
        if !fs::try_exists(&self.base_path).await? {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;

        while let Some(entry) = entries.next_entry().await? {
            if let Some(file_name) = entry.file_name().to_str()
                && let Some(parsed) = SchemaFileName::parse(file_name)
                && parsed.database == database
                && parsed.table == table
            {
                versions.push(parsed.version);
            }
        }

        versions.sort();
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdcs_schema::{NoopSink, assemble_default};
    use tempfile::TempDir;

    fn document(columns: &[(&str, &str)]) -> SchemaDocument {
        assemble_default(columns.iter().copied(), &NoopSink)
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemSchemaStore::new(temp_dir.path().join("schemas"));
        let name = SchemaFileName::initial("shop", "orders");
        let doc = document(&[("id", "int(11)"), ("note", "text")]);

        let outcome = store.save(&name, &doc).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Written);

        let path = temp_dir.path().join("schemas/shop.orders.000001.avsc");
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with("}\n"));
        assert!(raw.starts_with(r#"{"namespace":"MaxScaleChangeDataSchema.avro","type":"record""#));

        let loaded = store.load(&name).await.unwrap();
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn test_existing_file_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemSchemaStore::new(temp_dir.path());
        let name = SchemaFileName::initial("shop", "orders");

        let first = document(&[("id", "int")]);
        let second = document(&[("id", "bigint")]);

        assert_eq!(store.save(&name, &first).await.unwrap(), SaveOutcome::Written);
        assert_eq!(store.save(&name, &second).await.unwrap(), SaveOutcome::Skipped);
        assert_eq!(store.load(&name).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_truncated_file_is_not_kept() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemSchemaStore::new(temp_dir.path());
        let name = SchemaFileName::initial("shop", "orders");
        let path = store.path_for(&name);
        std::fs::write(&path, r#"{"namespace":"MaxScaleCh"#).unwrap();

        let doc = document(&[("id", "int")]);
        let err = store.save(&name, &doc).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));

        let replacing = FileSystemSchemaStore::new(temp_dir.path()).with_overwrite(true);
        assert_eq!(replacing.save(&name, &doc).await.unwrap(), SaveOutcome::Written);
        assert_eq!(store.load(&name).await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_no_temporary_files_remain() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemSchemaStore::new(temp_dir.path());
        let name = SchemaFileName::initial("shop", "orders");
        let doc = document(&[("id", "int")]);

        store.save(&name, &doc).await.unwrap();
        store.save(&name, &doc).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["shop.orders.000001.avsc"]);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemSchemaStore::new(temp_dir.path()).with_overwrite(true);
        let name = SchemaFileName::initial("shop", "orders");

        let first = document(&[("id", "int"), ("name", "varchar(200)")]);
        let second = document(&[("id", "bigint")]);

        store.save(&name, &first).await.unwrap();
        assert_eq!(store.save(&name, &second).await.unwrap(), SaveOutcome::Written);
        assert_eq!(store.load(&name).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_versions() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemSchemaStore::new(temp_dir.path());
        let doc = document(&[("id", "int")]);

        for version in [3, 1, 2] {
            store
                .save(&SchemaFileName::new("shop", "orders", version), &doc)
                .await
                .unwrap();
        }
        store
            .save(&SchemaFileName::initial("shop", "customers"), &doc)
            .await
            .unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(store.versions("shop", "orders").await.unwrap(), vec![1, 2, 3]);
        assert_eq!(store.versions("shop", "customers").await.unwrap(), vec![1]);
        assert!(store.versions("shop", "missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_versions_of_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemSchemaStore::new(temp_dir.path().join("absent"));
        assert!(store.versions("shop", "orders").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemSchemaStore::new(temp_dir.path());
        let err = store
            .load(&SchemaFileName::initial("shop", "orders"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemSchemaStore::new(temp_dir.path());
        let err = store
            .save(&SchemaFileName::initial("shop", "../x"), &document(&[]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
    }
}
