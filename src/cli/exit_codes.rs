//! Process exit codes
//!
//! # Exit Code Categories
//!
//! - **0**: Success
//! - **1-3**: Generic failure, usage errors, and "not listed" from `check`
//! - **10-19**: Store and configuration errors

use devguard::errors::{ConfigError, StoreError};

/// Exit code constants
pub mod codes {
    /// Success exit code.
    pub const SUCCESS: u8 = 0;

    /// Generic error (fallback for unmapped errors).
    pub const GENERIC_ERROR: u8 = 1;

    /// Unknown or missing command, bad arguments.
    ///
    /// Usage text is printed to stdout.
    pub const USAGE: u8 = 2;

    /// `check` found that the device is not on the list.
    pub const NOT_LISTED: u8 = 3;

    /// The backing store could not be opened, read or written.
    pub const STORE_ACCESS: u8 = 10;

    /// The list value exists with a type other than multi-string.
    pub const TYPE_MISMATCH: u8 = 11;

    /// The configuration file could not be read, parsed or written.
    pub const CONFIG_ERROR: u8 = 12;
}

/// Maps a `StoreError` to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::TypeMismatch { .. } => codes::TYPE_MISMATCH,
        StoreError::Corrupt { .. } => codes::GENERIC_ERROR,
        StoreError::AccessDenied { .. } | StoreError::Io { .. } | StoreError::Unsupported { .. } => {
            codes::STORE_ACCESS
        }
    }
}

/// Maps any command error to its exit code.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(store) = err.downcast_ref::<StoreError>() {
        return store_exit_code(store);
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return codes::CONFIG_ERROR;
    }
    codes::GENERIC_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use devguard::store::ValueKind;
    use std::io;

    #[test]
    fn store_errors_map_to_codes() {
        let denied = StoreError::from_io(
            "SYSTEM\\X",
            devguard::errors::StoreOperation::Read,
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(store_exit_code(&denied), codes::STORE_ACCESS);

        let mismatch = StoreError::TypeMismatch {
            path: "SYSTEM\\X".into(),
            value_name: "WhitelistHashes".into(),
            expected: ValueKind::MultiString,
            found: ValueKind::Dword,
        };
        assert_eq!(store_exit_code(&mismatch), codes::TYPE_MISMATCH);
    }

    #[test]
    fn anyhow_errors_are_downcast() {
        let err = anyhow::Error::new(ConfigError::AlreadyExists {
            path: "x.toml".into(),
        });
        assert_eq!(exit_code_for(&err), codes::CONFIG_ERROR);

        let err = anyhow::Error::new(StoreError::Unsupported {
            backend: "registry",
            platform: "linux",
        });
        assert_eq!(exit_code_for(&err), codes::STORE_ACCESS);

        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), codes::GENERIC_ERROR);
    }
}
