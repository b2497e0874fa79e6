//! Allow-list Module - Persisted set of device fingerprints
//!
//! The list lives as one multi-string value under
//! `<services_root>\<service>\Parameters` and is mutated by single
//! read-modify-write cycles. No locking is done here: two writers racing on
//! the same key can lose an update, and the last `set` wins.
//!
//! ```
//! use devguard::allowlist::{AllowList, AddOutcome};
//! use devguard::store::MemoryStore;
//!
//! let list = AllowList::with_defaults(MemoryStore::new());
//! let first = list.add("ABC-123").unwrap();
//! assert!(first.was_added());
//! assert!(matches!(list.add("abc-123").unwrap(), AddOutcome::AlreadyExists { .. }));
//! assert_eq!(list.list().unwrap(), vec![first.token().to_string()]);
//! ```

mod config;
mod manager;

pub use config::{AllowListConfig, DEFAULT_SERVICE, DEFAULT_SERVICES_ROOT, DEFAULT_VALUE_NAME};
pub use manager::{
    canonicalize_entries, parse_for_driver, AddOutcome, AllowList, CheckOutcome, DriverView,
    RemoveOutcome,
};
