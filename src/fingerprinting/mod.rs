//! Device Identifier Fingerprinting Module
//!
//! Turns raw device identifiers (serial numbers, PnP instance tails) into the
//! fixed-width tokens stored in the allow-list.
//!
//! # Architecture
//!
//! The fingerprinting pipeline consists of two components:
//! - `SerialNormalizer`: Canonicalizes raw identifiers (trim, strip the
//!   `&`-delimited instance suffix, uppercase)
//! - `FingerprintHasher`: FNV-1a 64 over the UTF-16LE bytes of the normalized
//!   identifier, rendered as a `FingerprintToken`
//!
//! The consuming driver recomputes the same hash from the wide string it reads
//! off the device, so every step here is bit-exact with that computation.
//!
//! # Example
//!
//! ```rust
//! use devguard::fingerprinting::{FingerprintHasher, SerialNormalizer};
//!
//! assert_eq!(SerialNormalizer::normalize("  4c53&0&1 "), "4C53");
//!
//! let token = FingerprintHasher::hash("4c53&0&1");
//! assert_eq!(token, FingerprintHasher::hash("4C53"));
//! assert_eq!(token.to_hex().len(), 16);
//! ```

mod hasher;
mod normalizer;
mod types;

pub use hasher::{decode_utf16_dropping, FingerprintHasher, FNV_OFFSET_BASIS, FNV_PRIME};
pub use normalizer::SerialNormalizer;
pub use types::{FingerprintToken, TokenParseError};
