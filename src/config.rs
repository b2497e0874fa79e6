//! Configuration - TOML settings for the allow-list and its store
//!
//! Looks for a config file in:
//! 1. The path given with `--config`
//! 2. `.devguard.toml` in the current directory
//! 3. `<config dir>/devguard/config.toml`
//!
//! No file at all means defaults. A file that exists but does not parse is an
//! error. Command-line flags are applied on top with [`DevguardConfig::apply_overrides`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allowlist::AllowListConfig;
use crate::errors::ConfigError;
use crate::store::{default_store_path, StoreBackend};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = ".devguard.toml";

/// Template written by `devguard init`
pub const DEFAULT_CONFIG: &str = r#"# devguard configuration

[allowlist]
# Driver service whose Parameters key holds the list
service = "MyDriver1"

# Multi-string value holding the fingerprint tokens
value_name = "WhitelistHashes"

# Parent of the service keys (under HKEY_LOCAL_MACHINE)
services_root = "SYSTEM\\CurrentControlSet\\Services"

[store]
# Backing store: registry (Windows) or file
# backend = "registry"

# Base directory for the file backend
# path = "/var/lib/devguard/store"
"#;

/// Store backend kinds selectable from config and CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Registry,
    File,
}

/// `[store]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    /// Platform default when unset
    #[serde(default)]
    pub backend: Option<BackendKind>,
    /// Base directory for the file backend
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Full configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevguardConfig {
    #[serde(default)]
    pub allowlist: AllowListConfig,
    #[serde(default)]
    pub store: StoreSection,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl DevguardConfig {
    /// Load using the lookup order above
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load_first(&Self::search_paths()),
        }
    }

    /// Candidate files when no explicit path is given
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("devguard").join("config.toml"));
        }
        paths
    }

    fn load_first(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        for candidate in candidates {
            if candidate.exists() {
                return Self::load_from_path(candidate);
            }
        }
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load a specific file; a missing file is an error here
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;

        let mut config = Self::parse(&shown, &content)?;
        config.source = Some(path.to_path_buf());
        debug!(path = %shown, "Loaded config file");
        Ok(config)
    }

    /// Parse and validate TOML content
    pub fn parse(name: &str, content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::parse(name, content, &e))?;
        config.allowlist.validate()?;
        Ok(config)
    }

    /// Apply command-line flags over file values
    ///
    /// `--store-dir` without `--backend` selects the file backend.
    pub fn apply_overrides(
        &mut self,
        backend: Option<BackendKind>,
        store_dir: Option<PathBuf>,
    ) -> &mut Self {
        if let Some(dir) = store_dir {
            self.store.path = Some(dir);
            if backend.is_none() {
                self.store.backend = Some(BackendKind::File);
            }
        }
        if backend.is_some() {
            self.store.backend = backend;
        }
        self
    }

    /// Allow-list settings for one command, with an optional service override
    pub fn allowlist_for(&self, service: Option<&str>) -> Result<AllowListConfig, ConfigError> {
        let config = match service {
            Some(service) => self.allowlist.clone().with_service(service),
            None => self.allowlist.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolved store backend
    pub fn store_backend(&self) -> StoreBackend {
        match self.store.backend {
            Some(BackendKind::Registry) => StoreBackend::Registry,
            Some(BackendKind::File) => StoreBackend::File {
                path: self.store.path.clone().unwrap_or_else(default_store_path),
            },
            None => match &self.store.path {
                Some(path) => StoreBackend::File { path: path.clone() },
                None => StoreBackend::default(),
            },
        }
    }
}

/// Write the default template, refusing to clobber unless `force`
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    let display = path.display().to_string();
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists { path: display });
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: display.clone(),
            source,
        })?;
    }
    fs::write(path, DEFAULT_CONFIG).map_err(|source| ConfigError::Write {
        path: display,
        source,
    })
}
