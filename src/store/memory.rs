//! Memory Store - In-memory key/value store
//!
//! Ephemeral storage in a HashMap. Used by tests and anywhere the registry
//! must not be touched.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use tracing::trace;

use super::{ConfigStore, StorePath, StoreValue};
use crate::errors::{StoreError, StoreOperation};

/// Values under one key, indexed by case-folded value name
type KeyValues = HashMap<String, StoreValue>;

/// In-memory store implementation
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Keys indexed by case-folded path
    keys: RwLock<HashMap<String, KeyValues>>,
    /// Simulates a caller without the rights to open any key
    deny_access: AtomicBool,
    /// Number of successful writes
    writes: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value of any type (useful for testing)
    pub fn insert(&self, path: &StorePath, name: &str, value: StoreValue) {
        let mut keys = self.keys.write().unwrap_or_else(|e| e.into_inner());
        keys.entry(path.folded())
            .or_default()
            .insert(name.to_lowercase(), value);
    }

    /// Make every subsequent get/set fail with `AccessDenied`
    pub fn set_access_denied(&self, denied: bool) {
        self.deny_access.store(denied, Ordering::SeqCst);
    }

    /// Whether a key exists
    pub fn contains_key(&self, path: &StorePath) -> bool {
        let keys = self.keys.read().unwrap_or_else(|e| e.into_inner());
        keys.contains_key(&path.folded())
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_access(&self, path: &StorePath, operation: StoreOperation) -> Result<(), StoreError> {
        if self.deny_access.load(Ordering::SeqCst) {
            return Err(StoreError::AccessDenied {
                path: path.to_string(),
                operation,
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        Ok(())
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, path: &StorePath, name: &str) -> Result<Option<StoreValue>, StoreError> {
        self.check_access(path, StoreOperation::Read)?;

        let keys = self.keys.read().unwrap_or_else(|e| e.into_inner());
        let value = keys
            .get(&path.folded())
            .and_then(|values| values.get(&name.to_lowercase()))
            .cloned();

        trace!(path = %path, name, found = value.is_some(), "memory store get");
        Ok(value)
    }

    fn set(&self, path: &StorePath, name: &str, value: &StoreValue) -> Result<(), StoreError> {
        self.check_access(path, StoreOperation::Write)?;

        let mut keys = self.keys.write().unwrap_or_else(|e| e.into_inner());
        keys.entry(path.folded())
            .or_default()
            .insert(name.to_lowercase(), value.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);

        trace!(path = %path, name, "memory store set");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
