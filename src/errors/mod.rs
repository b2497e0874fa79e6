//! Error types with miette diagnostics
//!
//! Store failures and configuration problems are explicit error values, so
//! callers decide how to surface them. The CLI renders them through miette and
//! maps each kind to its own exit code.

use std::io;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::store::ValueKind;

/// Which half of a read-modify-write cycle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Read,
    Write,
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreOperation::Read => write!(f, "read"),
            StoreOperation::Write => write!(f, "write"),
        }
    }
}

/// Errors raised by a backing store
#[derive(Error, Debug, Diagnostic)]
pub enum StoreError {
    /// The key could not be opened or created with the required access
    #[error("Access denied: cannot {operation} '{path}'")]
    #[diagnostic(
        code(devguard::store::access_denied),
        help(
            "The allow-list lives under HKEY_LOCAL_MACHINE and needs administrative rights.\n\
             Run the command from an elevated prompt, or point --store-dir at a writable directory."
        )
    )]
    AccessDenied {
        path: String,
        operation: StoreOperation,
        #[source]
        source: io::Error,
    },

    /// Any other failure while talking to the store
    #[error("Store I/O failed: cannot {operation} '{path}': {source}")]
    #[diagnostic(code(devguard::store::io))]
    Io {
        path: String,
        operation: StoreOperation,
        #[source]
        source: io::Error,
    },

    /// The value exists but has the wrong type
    #[error("{value_name} exists under '{path}' but is {found}, expected {expected}")]
    #[diagnostic(
        code(devguard::store::type_mismatch),
        help(
            "The value was created by something other than devguard.\n\
             Inspect it and delete it manually if it is safe to do so; devguard will not overwrite it."
        )
    )]
    TypeMismatch {
        path: String,
        value_name: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A file-backed key could not be decoded
    #[error("Store file '{path}' is corrupt: {message}")]
    #[diagnostic(code(devguard::store::corrupt))]
    Corrupt { path: String, message: String },

    /// The selected backend does not exist on this platform
    #[error("The {backend} backend is not available on {platform}")]
    #[diagnostic(
        code(devguard::store::unsupported),
        help("Use the file backend instead: --backend file")
    )]
    Unsupported {
        backend: &'static str,
        platform: &'static str,
    },
}

impl StoreError {
    /// Map an I/O error, separating permission failures from the rest
    pub fn from_io(path: impl Into<String>, operation: StoreOperation, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            StoreError::AccessDenied {
                path,
                operation,
                source,
            }
        } else {
            StoreError::Io {
                path,
                operation,
                source,
            }
        }
    }

    /// Whether the store itself could not be reached
    pub fn is_access_failure(&self) -> bool {
        matches!(
            self,
            StoreError::AccessDenied { .. } | StoreError::Io { .. } | StoreError::Unsupported { .. }
        )
    }
}

/// Errors raised while loading or writing configuration
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    /// Configuration file exists but cannot be read
    #[error("Failed to read config file '{path}'")]
    #[diagnostic(code(devguard::config::read))]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid TOML or has the wrong shape
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(devguard::config::invalid))]
    Parse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("error here")]
        span: Option<SourceSpan>,
    },

    /// A service name that cannot form a store path
    #[error("Invalid service name '{name}': {reason}")]
    #[diagnostic(
        code(devguard::config::service_name),
        help("Use the driver's service key name, e.g. 'MyDriver1'")
    )]
    InvalidServiceName { name: String, reason: String },

    /// An empty value name
    #[error("Invalid value name '{name}': value name is empty")]
    #[diagnostic(code(devguard::config::value_name))]
    InvalidValueName { name: String },

    /// Refusing to overwrite an existing file
    #[error("Config file already exists: {path}")]
    #[diagnostic(
        code(devguard::config::exists),
        help("Use --force to overwrite it")
    )]
    AlreadyExists { path: String },

    /// Config file could not be written
    #[error("Failed to write config file '{path}'")]
    #[diagnostic(code(devguard::config::write))]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Build a parse error pointing into the offending file
    pub fn parse(path: &str, content: &str, err: &toml::de::Error) -> Self {
        ConfigError::Parse {
            message: err.message().to_string(),
            src: NamedSource::new(path, content.to_string()),
            span: err.span().map(SourceSpan::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_io_maps_permission_denied() {
        let err = StoreError::from_io(
            "SYSTEM\\X",
            StoreOperation::Write,
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, StoreError::AccessDenied { .. }));
        assert!(err.is_access_failure());
        assert!(err.to_string().contains("cannot write"));
    }

    #[test]
    fn from_io_other_kinds() {
        let err = StoreError::from_io(
            "SYSTEM\\X",
            StoreOperation::Read,
            io::Error::from(io::ErrorKind::Other),
        );
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.is_access_failure());
    }

    #[test]
    fn type_mismatch_message() {
        let err = StoreError::TypeMismatch {
            path: "SYSTEM\\CurrentControlSet\\Services\\MyDriver1\\Parameters".into(),
            value_name: "WhitelistHashes".into(),
            expected: ValueKind::MultiString,
            found: ValueKind::String,
        };
        assert!(!err.is_access_failure());
        assert_eq!(
            err.to_string(),
            "WhitelistHashes exists under 'SYSTEM\\CurrentControlSet\\Services\\MyDriver1\\Parameters' \
             but is REG_SZ, expected REG_MULTI_SZ"
        );
    }

    #[test]
    fn diagnostic_codes() {
        let err = StoreError::Unsupported {
            backend: "registry",
            platform: "linux",
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("devguard::store::unsupported"));
    }

    #[test]
    fn config_parse_error_has_span() {
        let content = "[allowlist]\nservice = \n";
        let err = content.parse::<toml::Table>().unwrap_err();
        let cfg_err = ConfigError::parse("devguard.toml", content, &err);
        match cfg_err {
            ConfigError::Parse { span, .. } => assert!(span.is_some()),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
