//! Store Values - Typed values held under a store key

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag of a stored value, named after its registry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    ExpandString,
    MultiString,
    Dword,
    Qword,
    Binary,
    /// Any registry type this crate has no representation for
    Other,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "REG_SZ",
            ValueKind::ExpandString => "REG_EXPAND_SZ",
            ValueKind::MultiString => "REG_MULTI_SZ",
            ValueKind::Dword => "REG_DWORD",
            ValueKind::Qword => "REG_QWORD",
            ValueKind::Binary => "REG_BINARY",
            ValueKind::Other => "an unsupported type",
        };
        write!(f, "{}", name)
    }
}

/// A value read from or written to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StoreValue {
    String(String),
    ExpandString(String),
    MultiString(Vec<String>),
    Dword(u32),
    Qword(u64),
    Binary(Vec<u8>),
    /// Raw bytes of a type with no dedicated variant
    Other { type_id: u32, bytes: Vec<u8> },
}

impl StoreValue {
    /// Type tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            StoreValue::String(_) => ValueKind::String,
            StoreValue::ExpandString(_) => ValueKind::ExpandString,
            StoreValue::MultiString(_) => ValueKind::MultiString,
            StoreValue::Dword(_) => ValueKind::Dword,
            StoreValue::Qword(_) => ValueKind::Qword,
            StoreValue::Binary(_) => ValueKind::Binary,
            StoreValue::Other { .. } => ValueKind::Other,
        }
    }

    /// Borrow the entries of a multi-string value
    pub fn as_multi_string(&self) -> Option<&[String]> {
        match self {
            StoreValue::MultiString(items) => Some(items),
            _ => None,
        }
    }

    /// Take the entries of a multi-string value
    pub fn into_multi_string(self) -> Result<Vec<String>, Self> {
        match self {
            StoreValue::MultiString(items) => Ok(items),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(StoreValue::MultiString(vec![]).kind(), ValueKind::MultiString);
        assert_eq!(StoreValue::Dword(1).kind(), ValueKind::Dword);
        assert_eq!(
            StoreValue::Other {
                type_id: 8,
                bytes: vec![]
            }
            .kind(),
            ValueKind::Other
        );
    }

    #[test]
    fn into_multi_string() {
        let v = StoreValue::MultiString(vec!["A".into()]);
        assert_eq!(v.as_multi_string(), Some(&["A".to_string()][..]));
        assert_eq!(v.into_multi_string().unwrap(), vec!["A".to_string()]);
        assert!(StoreValue::String("A".into()).into_multi_string().is_err());
    }

    #[test]
    fn serde_tagged_layout() {
        let v = StoreValue::MultiString(vec!["AB".into(), "CD".into()]);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "multi_string", "data": ["AB", "CD"]})
        );
        let back: StoreValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn kind_display_uses_registry_names() {
        assert_eq!(ValueKind::MultiString.to_string(), "REG_MULTI_SZ");
        assert_eq!(ValueKind::Binary.to_string(), "REG_BINARY");
    }
}
