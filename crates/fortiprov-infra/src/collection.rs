//! File-backed collection store.
//!
//! Reads the collection document fresh on every `load`, so a run always sees
//! the document as of its start. `save` writes a pretty-printed copy to a
//! temporary file in the same directory and renames it over the target.

use std::io::Write;
use std::path::{Path, PathBuf};

use fortiprov_core::store::CollectionStore;
use fortiprov_types::error::StoreError;
use serde::Serialize;
use serde_json::Value;

/// Collection stored as a single JSON file.
pub struct FileCollectionStore {
    path: PathBuf,
}

impl FileCollectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CollectionStore for FileCollectionStore {
    async fn load(&self) -> Result<Value, StoreError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", self.path.display())))?;
        serde_json::from_str(&content).map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn save(&self, document: &Value) -> Result<(), StoreError> {
        if !document.is_object() {
            return Err(StoreError::NotAnObject);
        }

        let bytes = to_pretty_json(document)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_replacing(&path, &bytes))
            .await
            .map_err(|e| StoreError::Io(e.to_string()))??;

        tracing::info!(path = %self.path.display(), "collection updated");
        Ok(())
    }
}

/// Serialize with a four-space indent.
fn to_pretty_json(document: &Value) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|e| StoreError::Serialize(e.to_string()))?;
    Ok(buf)
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let io_err = |e: std::io::Error| StoreError::Io(format!("{}: {e}", path.display()));

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
