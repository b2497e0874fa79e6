//! Fingerprint Data Types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of hex digits in a rendered token
pub const TOKEN_LEN: usize = 16;

/// Errors that can occur when parsing a token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenParseError {
    #[error("token is empty")]
    Empty,

    #[error("token '{input}' has {len} hex digits, expected {expected}")]
    WrongLength {
        input: String,
        len: usize,
        expected: usize,
    },

    #[error("token '{input}' contains non-hex character '{found}'")]
    InvalidDigit { input: String, found: char },
}

/// A device fingerprint: 64-bit hash rendered as 16 uppercase hex digits
///
/// The stored form is always canonical, so two tokens compare equal exactly
/// when their hash values do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FingerprintToken(u64);

impl FingerprintToken {
    /// Wrap a raw hash value
    pub const fn from_hash(hash: u64) -> Self {
        Self(hash)
    }

    /// The underlying hash value
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Canonical rendering (16 uppercase hex digits)
    pub fn to_hex(&self) -> String {
        format!("{:016X}", self.0)
    }

    /// Strict parse: exactly 16 hex digits, surrounding whitespace ignored
    ///
    /// Lowercase digits are accepted; the token is rendered uppercase.
    pub fn parse(input: &str) -> Result<Self, TokenParseError> {
        let trimmed = input.trim();
        let len = trimmed.chars().count();
        if len == 0 {
            return Err(TokenParseError::Empty);
        }
        if len != TOKEN_LEN {
            return Err(TokenParseError::WrongLength {
                input: trimmed.to_string(),
                len,
                expected: TOKEN_LEN,
            });
        }
        Self::parse_digits(trimmed)
    }

    /// Lenient parse: 1 to 16 hex digits, surrounding whitespace ignored
    ///
    /// This is how the consuming driver reads stored entries; anything it
    /// cannot parse this way is skipped at load time.
    pub fn parse_lenient(input: &str) -> Result<Self, TokenParseError> {
        let trimmed = input.trim_matches([' ', '\t', '\r', '\n']);
        let len = trimmed.chars().count();
        if len == 0 {
            return Err(TokenParseError::Empty);
        }
        if len > TOKEN_LEN {
            return Err(TokenParseError::WrongLength {
                input: trimmed.to_string(),
                len,
                expected: TOKEN_LEN,
            });
        }
        Self::parse_digits(trimmed)
    }

    fn parse_digits(digits: &str) -> Result<Self, TokenParseError> {
        let mut value = 0u64;
        for c in digits.chars() {
            let d = c.to_digit(16).ok_or_else(|| TokenParseError::InvalidDigit {
                input: digits.to_string(),
                found: c,
            })?;
            value = (value << 4) | u64::from(d);
        }
        Ok(Self(value))
    }
}

impl fmt::Display for FingerprintToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

impl FromStr for FingerprintToken {
    type Err = TokenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<FingerprintToken> for u64 {
    fn from(token: FingerprintToken) -> Self {
        token.0
    }
}

impl PartialEq<str> for FingerprintToken {
    fn eq(&self, other: &str) -> bool {
        self.to_hex() == other
    }
}

impl PartialEq<&str> for FingerprintToken {
    fn eq(&self, other: &&str) -> bool {
        self.to_hex() == *other
    }
}

impl Serialize for FingerprintToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FingerprintToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
