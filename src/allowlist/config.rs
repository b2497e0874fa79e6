//! Allow-list configuration
//!
//! Names the backing collection: which service key holds the list and under
//! which value name.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::store::StorePath;

/// Service whose `Parameters` key holds the list when none is given
pub const DEFAULT_SERVICE: &str = "MyDriver1";

/// Multi-string value holding the tokens
pub const DEFAULT_VALUE_NAME: &str = "WhitelistHashes";

/// Parent of all service keys under HKEY_LOCAL_MACHINE
pub const DEFAULT_SERVICES_ROOT: &str = "SYSTEM\\CurrentControlSet\\Services";

/// Allow-list configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowListConfig {
    /// Service (driver) name
    #[serde(default = "default_service")]
    pub service: String,
    /// Name of the multi-string value
    #[serde(default = "default_value_name")]
    pub value_name: String,
    /// Root under which service keys live
    #[serde(default = "default_services_root")]
    pub services_root: String,
}

fn default_service() -> String {
    DEFAULT_SERVICE.to_string()
}
fn default_value_name() -> String {
    DEFAULT_VALUE_NAME.to_string()
}
fn default_services_root() -> String {
    DEFAULT_SERVICES_ROOT.to_string()
}

impl Default for AllowListConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            value_name: default_value_name(),
            services_root: default_services_root(),
        }
    }
}

impl AllowListConfig {
    /// Config for a specific service, other fields defaulted
    pub fn for_service(service: impl Into<String>) -> Self {
        Self::default().with_service(service)
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = value_name.into();
        self
    }

    pub fn with_services_root(mut self, root: impl Into<String>) -> Self {
        self.services_root = root.into();
        self
    }

    /// Key holding the list: `<services_root>\<service>\Parameters`
    pub fn store_path(&self) -> StorePath {
        StorePath::for_service(&self.services_root, &self.service)
    }

    /// Reject names that cannot form a store path
    pub fn validate(&self) -> Result<(), ConfigError> {
        let service = self.service.trim();
        if service.is_empty() {
            return Err(ConfigError::InvalidServiceName {
                name: self.service.clone(),
                reason: "service name is empty".to_string(),
            });
        }
        if service.contains(['\\', '/']) {
            return Err(ConfigError::InvalidServiceName {
                name: self.service.clone(),
                reason: "service name must not contain a path separator".to_string(),
            });
        }
        if service == "." || service == ".." {
            return Err(ConfigError::InvalidServiceName {
                name: self.service.clone(),
                reason: "service name must not be a relative path segment".to_string(),
            });
        }
        if self.value_name.trim().is_empty() {
            return Err(ConfigError::InvalidValueName {
                name: self.value_name.clone(),
            });
        }
        Ok(())
    }
}
