//! Allow-list manager
//!
//! Each operation is one read-modify-write against the backing store. Every
//! write re-derives the persisted invariant over the whole set (trimmed,
//! uppercase, blank-free, deduplicated, sorted), so inconsistent data written
//! by someone else is healed on the next mutation.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::config::AllowListConfig;
use crate::errors::StoreError;
use crate::fingerprinting::{FingerprintHasher, FingerprintToken, SerialNormalizer};
use crate::store::{ConfigStore, StoreValue, ValueKind};

/// Result of an `add`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AddOutcome {
    /// Token appended and the list persisted
    Added {
        token: FingerprintToken,
        normalized: String,
    },
    /// Token was already listed; nothing was written
    AlreadyExists {
        token: FingerprintToken,
        normalized: String,
    },
}

impl AddOutcome {
    pub fn token(&self) -> FingerprintToken {
        match self {
            AddOutcome::Added { token, .. } | AddOutcome::AlreadyExists { token, .. } => *token,
        }
    }

    pub fn normalized(&self) -> &str {
        match self {
            AddOutcome::Added { normalized, .. }
            | AddOutcome::AlreadyExists { normalized, .. } => normalized,
        }
    }

    pub fn was_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

/// Result of a `remove`; removing an absent token still succeeds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveOutcome {
    /// Requested token, trimmed and uppercased
    pub token: String,
    /// Whether the token was listed before the write
    pub was_present: bool,
    /// Entries left after the write
    pub remaining: usize,
}

/// Whether the consuming driver would accept a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub normalized: String,
    pub token: FingerprintToken,
    pub allowed: bool,
    /// Stored entries the driver cannot parse and skips
    pub ignored_entries: Vec<String>,
}

/// The list as the driver loads it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverView {
    /// Entries that parse as 1-16 hex digits
    pub accepted: BTreeSet<FingerprintToken>,
    /// Entries the driver skips
    pub ignored: Vec<String>,
}

impl DriverView {
    pub fn contains(&self, token: FingerprintToken) -> bool {
        self.accepted.contains(&token)
    }
}

/// Parse stored entries the way the driver does
pub fn parse_for_driver<S: AsRef<str>>(entries: &[S]) -> DriverView {
    let mut view = DriverView::default();
    for entry in entries.iter().map(AsRef::as_ref) {
        match FingerprintToken::parse_lenient(entry) {
            Ok(token) => {
                view.accepted.insert(token);
            }
            Err(_) => view.ignored.push(entry.to_string()),
        }
    }
    view
}

fn canonical_entry(entry: &str) -> String {
    SerialNormalizer::trim(entry).to_uppercase()
}

/// Trim, uppercase, drop blanks, dedupe and sort
pub fn canonicalize_entries<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    entries
        .iter()
        .map(|e| canonical_entry(e.as_ref()))
        .filter(|e| !e.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Allow-list bound to one store and one service
pub struct AllowList<S> {
    store: S,
    config: AllowListConfig,
}

impl<S: ConfigStore> AllowList<S> {
    pub fn new(store: S, config: AllowListConfig) -> Self {
        Self { store, config }
    }

    /// Default service and value name
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, AllowListConfig::default())
    }

    pub fn config(&self) -> &AllowListConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored entries exactly as found
    ///
    /// An absent key or value reads as an empty list. A value of any other
    /// type than multi-string is a `TypeMismatch`.
    pub fn raw_entries(&self) -> Result<Vec<String>, StoreError> {
        let path = self.config.store_path();
        let value = self.store.get(&path, &self.config.value_name)?;

        let entries = match value {
            None => Vec::new(),
            Some(value) => {
                value
                    .into_multi_string()
                    .map_err(|other| StoreError::TypeMismatch {
                        path: path.to_string(),
                        value_name: self.config.value_name.clone(),
                        expected: ValueKind::MultiString,
                        found: other.kind(),
                    })?
            }
        };

        debug!(
            service = %self.config.service,
            backend = self.store.backend_name(),
            entries = entries.len(),
            "Read allow-list"
        );
        Ok(entries)
    }

    /// Listed tokens, trimmed and uppercased, blanks dropped, in stored order
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .raw_entries()?
            .iter()
            .map(|e| canonical_entry(e))
            .filter(|e| !e.is_empty())
            .collect())
    }

    /// Hash `raw` and add its token
    pub fn add(&self, raw: &str) -> Result<AddOutcome, StoreError> {
        let normalized = SerialNormalizer::normalize(raw);
        let token = FingerprintHasher::hash_normalized(&normalized);
        let rendered = token.to_hex();

        let mut entries = self.raw_entries()?;
        if entries.iter().any(|e| canonical_entry(e) == rendered) {
            debug!(token = %token, "Token already listed, nothing written");
            return Ok(AddOutcome::AlreadyExists { token, normalized });
        }

        let previous = entries.clone();
        entries.push(rendered);
        self.write_entries(&previous, &entries)?;

        Ok(AddOutcome::Added { token, normalized })
    }

    /// Remove a token; the list is written even when it was not present
    pub fn remove(&self, token: &str) -> Result<RemoveOutcome, StoreError> {
        let token = canonical_entry(token);

        let previous = self.raw_entries()?;
        let mut was_present = false;
        let entries: Vec<String> = previous
            .iter()
            .filter(|e| {
                let listed = canonical_entry(e) == token;
                was_present |= listed;
                !listed
            })
            .cloned()
            .collect();

        if !was_present {
            debug!(token = %token, "Token not listed");
        }
        let remaining = self.write_entries(&previous, &entries)?;

        Ok(RemoveOutcome {
            token,
            was_present,
            remaining,
        })
    }

    /// Whether the driver would accept a device with this identifier
    pub fn check(&self, raw: &str) -> Result<CheckOutcome, StoreError> {
        let normalized = SerialNormalizer::normalize(raw);
        let token = FingerprintHasher::hash_normalized(&normalized);
        let view = parse_for_driver(&self.raw_entries()?);

        Ok(CheckOutcome {
            allowed: view.contains(token),
            normalized,
            token,
            ignored_entries: view.ignored,
        })
    }

    /// The list as the driver would load it
    pub fn driver_view(&self) -> Result<DriverView, StoreError> {
        Ok(parse_for_driver(&self.raw_entries()?))
    }

    fn write_entries(&self, previous: &[String], entries: &[String]) -> Result<usize, StoreError> {
        if canonicalize_entries(previous) != previous {
            warn!(
                service = %self.config.service,
                "Stored allow-list was not canonical; rewriting it sorted and deduplicated"
            );
        }

        let canonical = canonicalize_entries(entries);
        let count = canonical.len();
        self.store.set(
            &self.config.store_path(),
            &self.config.value_name,
            &StoreValue::MultiString(canonical),
        )?;

        info!(
            service = %self.config.service,
            backend = self.store.backend_name(),
            entries = count,
            "Wrote allow-list"
        );
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn stored(list: &AllowList<MemoryStore>) -> Option<StoreValue> {
        let config = list.config();
        list.store()
            .get(&config.store_path(), &config.value_name)
            .unwrap()
    }

    fn seed(list: &AllowList<MemoryStore>, value: StoreValue) {
        let config = list.config();
        list.store()
            .insert(&config.store_path(), &config.value_name, value);
    }

    fn multi(items: &[&str]) -> StoreValue {
        StoreValue::MultiString(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn list_absent_key_is_empty() {
        let list = AllowList::with_defaults(MemoryStore::new());
        assert!(list.list().unwrap().is_empty());
        assert!(!list
            .store()
            .contains_key(&list.config().store_path()));
    }

    #[test]
    fn list_trims_and_uppercases() {
        let list = AllowList::with_defaults(MemoryStore::new());
        seed(&list, multi(&[" 00000000000000ab ", "", "   ", "FFFFFFFFFFFFFFFF"]));
        assert_eq!(
            list.list().unwrap(),
            vec!["00000000000000AB", "FFFFFFFFFFFFFFFF"]
        );
    }

    #[test]
    fn separator_controls_are_trimmed() {
        let list = AllowList::with_defaults(MemoryStore::new());
        seed(&list, multi(&["0000000000000001\u{1f}", "\u{1e}0000000000000002"]));
        assert_eq!(
            list.list().unwrap(),
            vec!["0000000000000001", "0000000000000002"]
        );

        let removed = list.remove("\u{1c}0000000000000002").unwrap();
        assert!(removed.was_present);
        assert_eq!(removed.token, "0000000000000002");
        assert_eq!(removed.remaining, 1);
        assert_eq!(stored(&list), Some(multi(&["0000000000000001"])));
    }

    #[test]
    fn list_wrong_type_is_mismatch() {
        let list = AllowList::with_defaults(MemoryStore::new());
        seed(&list, StoreValue::String("0000000000000001".into()));
        let err = list.list().unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch {
                found: ValueKind::String,
                expected: ValueKind::MultiString,
                ..
            }
        ));
    }

    #[test]
    fn add_persists_token() {
        let list = AllowList::with_defaults(MemoryStore::new());
        let outcome = list.add("  abc-123&0 ").unwrap();
        assert!(outcome.was_added());
        assert_eq!(outcome.normalized(), "ABC-123");
        assert_eq!(outcome.token(), FingerprintHasher::hash("ABC-123"));
        assert_eq!(
            stored(&list),
            Some(StoreValue::MultiString(vec!["013935F88C636896".into()]))
        );
    }

    #[test]
    fn duplicate_add_does_not_write() {
        let list = AllowList::with_defaults(MemoryStore::new());
        list.add("ABC-123").unwrap();
        assert_eq!(list.store().write_count(), 1);

        let outcome = list.add("abc-123").unwrap();
        assert!(matches!(outcome, AddOutcome::AlreadyExists { .. }));
        assert_eq!(list.store().write_count(), 1);
        assert_eq!(list.list().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_detection_ignores_stored_case() {
        let list = AllowList::with_defaults(MemoryStore::new());
        seed(&list, multi(&["013935f88c636896"]));
        let outcome = list.add("ABC-123").unwrap();
        assert!(!outcome.was_added());
        assert_eq!(list.store().write_count(), 0);
    }

    #[test]
    fn add_heals_existing_entries() {
        let list = AllowList::with_defaults(MemoryStore::new());
        seed(
            &list,
            multi(&["ffffffffffffffff", " 0000000000000001", "", "FFFFFFFFFFFFFFFF"]),
        );
        list.add("ABC-123").unwrap();
        assert_eq!(
            stored(&list),
            Some(multi(&[
                "0000000000000001",
                "013935F88C636896",
                "FFFFFFFFFFFFFFFF"
            ]))
        );
    }

    #[test]
    fn remove_writes_sorted_remainder() {
        let list = AllowList::with_defaults(MemoryStore::new());
        seed(
            &list,
            multi(&["FFFFFFFFFFFFFFFF", "0000000000000002", "0000000000000001"]),
        );
        let outcome = list.remove(" ffffffffffffffff ").unwrap();
        assert_eq!(outcome.token, "FFFFFFFFFFFFFFFF");
        assert!(outcome.was_present);
        assert_eq!(outcome.remaining, 2);
        assert_eq!(
            stored(&list),
            Some(multi(&["0000000000000001", "0000000000000002"]))
        );
    }

    #[test]
    fn remove_absent_token_still_writes() {
        let list = AllowList::with_defaults(MemoryStore::new());
        let outcome = list.remove("0123456789ABCDEF").unwrap();
        assert!(!outcome.was_present);
        assert_eq!(outcome.remaining, 0);
        assert_eq!(list.store().write_count(), 1);
        assert_eq!(stored(&list), Some(StoreValue::MultiString(vec![])));
    }

    #[test]
    fn remove_on_wrong_type_fails_without_write() {
        let list = AllowList::with_defaults(MemoryStore::new());
        seed(&list, StoreValue::Dword(1));
        assert!(list.remove("0000000000000001").is_err());
        assert_eq!(list.store().write_count(), 0);
        assert_eq!(stored(&list), Some(StoreValue::Dword(1)));
    }

    #[test]
    fn access_denied_propagates() {
        let list = AllowList::with_defaults(MemoryStore::new());
        list.store().set_access_denied(true);
        assert!(matches!(
            list.add("ABC-123"),
            Err(StoreError::AccessDenied { .. })
        ));
        assert!(matches!(list.list(), Err(StoreError::AccessDenied { .. })));
    }

    #[test]
    fn services_are_isolated() {
        let store = MemoryStore::new();
        let a = AllowList::new(&store, AllowListConfig::for_service("DriverA"));
        let b = AllowList::new(&store, AllowListConfig::for_service("DriverB"));
        a.add("ABC-123").unwrap();
        assert_eq!(a.list().unwrap().len(), 1);
        assert!(b.list().unwrap().is_empty());
    }

    #[test]
    fn check_uses_driver_parsing() {
        let list = AllowList::with_defaults(MemoryStore::new());
        let token = FingerprintHasher::hash("ABC-123");
        // Leading zeros dropped: the driver still reads the same number
        let short = format!("{:X}", token.value());
        seed(&list, multi(&[short.as_str(), "not-a-token", "12345678901234567"]));

        let outcome = list.check("abc-123&5").unwrap();
        assert!(outcome.allowed);
        assert_eq!(outcome.token, token);
        assert_eq!(
            outcome.ignored_entries,
            vec!["not-a-token".to_string(), "12345678901234567".to_string()]
        );

        assert!(!list.check("XYZ").unwrap().allowed);
    }

    #[test]
    fn canonicalize_entries_sorts_and_dedupes() {
        let entries = canonicalize_entries(&["b", " A", "a ", "", "  ", "B"]);
        assert_eq!(entries, vec!["A", "B"]);
    }

    #[test]
    fn parse_for_driver_numeric_equality() {
        let view = parse_for_driver(&["00000000000000FF", "ff", " \tFF\r\n"]);
        assert_eq!(view.accepted.len(), 1);
        assert!(view.contains(FingerprintToken::from_hash(0xFF)));
        assert!(view.ignored.is_empty());
    }

    #[test]
    fn outcome_json_shape() {
        let outcome = AddOutcome::AlreadyExists {
            token: FingerprintToken::from_hash(1),
            normalized: "X".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "already_exists");
        assert_eq!(json["token"], "0000000000000001");
        assert_eq!(json["normalized"], "X");
    }
}
