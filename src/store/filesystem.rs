//! File Store - File-based key/value storage
//!
//! Implements the store on the local filesystem: every key is one JSON
//! document, laid out in directories that mirror the key path. Used on
//! platforms without a registry and for staging lists before deployment.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{ConfigStore, StorePath, StoreValue};
use crate::errors::{StoreError, StoreOperation};

/// On-disk form of a single key
#[derive(Debug, Default, Serialize, Deserialize)]
struct KeyDocument {
    /// Original key path, for humans reading the file
    #[serde(default)]
    key: String,
    /// Values indexed by case-folded name
    #[serde(default)]
    values: BTreeMap<String, StoreValue>,
}

/// Filesystem-based store implementation
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Base directory for store files
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `base_path`
    ///
    /// Nothing is created until the first write.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Base directory
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File holding the values of a key
    pub fn file_for_key(&self, path: &StorePath) -> PathBuf {
        let mut file = self.base_path.clone();
        let folded: Vec<String> = path.segments().iter().map(|s| s.to_lowercase()).collect();
        match folded.split_last() {
            Some((last, parents)) => {
                for segment in parents {
                    file.push(segment);
                }
                file.push(format!("{}.json", last));
            }
            None => file.push("root.json"),
        }
        file
    }

    /// Read a key document; `None` when the key does not exist
    fn read_document(&self, path: &StorePath) -> Result<Option<KeyDocument>, StoreError> {
        let file = self.file_for_key(path);
        let content = match fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::from_io(path.to_string(), StoreOperation::Read, e)),
        };

        let doc = serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: file.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(doc))
    }

    /// Write a key document through a temporary file
    fn write_document(&self, path: &StorePath, doc: &KeyDocument) -> Result<(), StoreError> {
        let file = self.file_for_key(path);
        let io_err = |e: io::Error| StoreError::from_io(path.to_string(), StoreOperation::Write, e);

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(doc).map_err(|e| StoreError::Corrupt {
            path: file.display().to_string(),
            message: e.to_string(),
        })?;

        let tmp = file.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, &file).map_err(io_err)?;
        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn get(&self, path: &StorePath, name: &str) -> Result<Option<StoreValue>, StoreError> {
        let value = self
            .read_document(path)?
            .and_then(|mut doc| doc.values.remove(&name.to_lowercase()));

        trace!(path = %path, name, found = value.is_some(), "file store get");
        Ok(value)
    }

    fn set(&self, path: &StorePath, name: &str, value: &StoreValue) -> Result<(), StoreError> {
        let mut doc = self.read_document(path)?.unwrap_or_default();
        doc.key = path.to_string();
        doc.values.insert(name.to_lowercase(), value.clone());
        self.write_document(path, &doc)?;

        trace!(path = %path, name, "file store set");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
