//! Store Module - Backing configuration store
//!
//! The allow-list is persisted as a single multi-string value under a
//! per-service key in a hierarchical key/value store. This module defines the
//! minimal get/set seam and its backends:
//! - Windows registry (`HKEY_LOCAL_MACHINE`, the production store)
//! - File-backed store (portable, one JSON document per key)
//! - In-memory store (tests and dry runs)
//!
//! Every backend scopes access to a single call: a key is opened right before
//! a read or write and released when the call returns, error paths included.

pub mod filesystem;
pub mod memory;
#[cfg(windows)]
pub mod registry;
mod value;
pub mod wide;

pub use filesystem::FileStore;
pub use memory::MemoryStore;
#[cfg(windows)]
pub use registry::RegistryStore;
pub use value::{StoreValue, ValueKind};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Path of a key inside the store, e.g. `SYSTEM\CurrentControlSet\Services\X\Parameters`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// Parse a path; both `\` and `/` separate segments, empty segments are dropped
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split(['\\', '/'])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    /// Append a single segment
    pub fn join(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    /// `<services_root>\<service>\Parameters`
    pub fn for_service(services_root: &str, service: &str) -> Self {
        Self::parse(services_root).join(service).join("Parameters")
    }

    /// Path segments in order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Case-folded form; keys compare case-insensitively
    pub fn folded(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("\\"))
    }
}

/// The get/set seam every backend implements
pub trait ConfigStore: Send + Sync {
    /// Read a value; `Ok(None)` when either the key or the value is absent
    fn get(&self, path: &StorePath, name: &str) -> Result<Option<StoreValue>, StoreError>;

    /// Write a value, creating the key if it does not exist
    fn set(&self, path: &StorePath, name: &str, value: &StoreValue) -> Result<(), StoreError>;

    /// Short backend name for logs and output
    fn backend_name(&self) -> &'static str;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &S {
    fn get(&self, path: &StorePath, name: &str) -> Result<Option<StoreValue>, StoreError> {
        (**self).get(path, name)
    }

    fn set(&self, path: &StorePath, name: &str, value: &StoreValue) -> Result<(), StoreError> {
        (**self).set(path, name, value)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for Box<S> {
    fn get(&self, path: &StorePath, name: &str) -> Result<Option<StoreValue>, StoreError> {
        (**self).get(path, name)
    }

    fn set(&self, path: &StorePath, name: &str, value: &StoreValue) -> Result<(), StoreError> {
        (**self).set(path, name, value)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for Arc<S> {
    fn get(&self, path: &StorePath, name: &str) -> Result<Option<StoreValue>, StoreError> {
        (**self).get(path, name)
    }

    fn set(&self, path: &StorePath, name: &str, value: &StoreValue) -> Result<(), StoreError> {
        (**self).set(path, name, value)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

/// Store backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreBackend {
    /// Windows registry under HKEY_LOCAL_MACHINE
    Registry,
    /// JSON documents under a base directory
    File {
        /// Base path for store files
        path: PathBuf,
    },
    /// Ephemeral in-memory store
    Memory,
}

impl Default for StoreBackend {
    fn default() -> Self {
        if cfg!(windows) {
            StoreBackend::Registry
        } else {
            StoreBackend::File {
                path: default_store_path(),
            }
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Registry => write!(f, "registry"),
            StoreBackend::File { path } => write!(f, "file ({})", path.display()),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

impl StoreBackend {
    /// Open the selected backend
    pub fn open(&self) -> Result<Box<dyn ConfigStore>, StoreError> {
        match self {
            #[cfg(windows)]
            StoreBackend::Registry => Ok(Box::new(RegistryStore::local_machine())),
            #[cfg(not(windows))]
            StoreBackend::Registry => Err(StoreError::Unsupported {
                backend: "registry",
                platform: std::env::consts::OS,
            }),
            StoreBackend::File { path } => Ok(Box::new(FileStore::new(path.clone()))),
            StoreBackend::Memory => Ok(Box::new(MemoryStore::new())),
        }
    }
}

/// Default base directory of the file backend
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devguard")
        .join("store")
}
