//! devguard - Device fingerprint allow-list
//!
//! Derives stable fingerprints from device identifiers and maintains the
//! persisted allow-list a filter driver consults to accept or reject hardware.
//!
//! # Modules
//!
//! - `fingerprinting` - identifier normalization and FNV-1a hashing
//! - `allowlist` - the persisted token set (list, add, remove, check)
//! - `store` - the backing key/value store seam and its backends
//! - `config` - TOML configuration
//! - `errors` - store and configuration errors
//!
//! # Example
//!
//! ```
//! use devguard::allowlist::{AllowList, AllowListConfig};
//! use devguard::store::MemoryStore;
//!
//! let list = AllowList::new(MemoryStore::new(), AllowListConfig::for_service("UsbGate"));
//! let outcome = list.add("ABC-123&0&1").unwrap();
//! assert_eq!(outcome.normalized(), "ABC-123");
//! assert_eq!(outcome.token().to_string(), "013935F88C636896");
//! ```

pub mod allowlist;
pub mod config;
pub mod errors;
pub mod fingerprinting;
pub mod store;

// Re-export commonly used types
pub use allowlist::{AllowList, AllowListConfig};
pub use fingerprinting::{FingerprintHasher, FingerprintToken, SerialNormalizer};
pub use store::{ConfigStore, StoreBackend};
