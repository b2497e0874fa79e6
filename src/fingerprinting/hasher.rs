//! Fingerprint Hasher
//!
//! Generates FNV-1a 64 hashes over the UTF-16LE encoding of normalized
//! identifiers. The byte stream is exactly what a native wide string holds in
//! memory, so the driver side can hash its `WCHAR` buffer directly.

use super::normalizer::SerialNormalizer;
use super::types::FingerprintToken;

/// FNV-1a 64-bit offset basis
pub const FNV_OFFSET_BASIS: u64 = 1_469_598_103_934_665_603;

/// FNV-1a 64-bit prime
pub const FNV_PRIME: u64 = 1_099_511_628_211;

/// Generates fingerprints from device identifiers
pub struct FingerprintHasher;

impl FingerprintHasher {
    /// Fingerprint a raw identifier
    ///
    /// Normalizes first, so every spelling of the same serial maps to the same
    /// token.
    pub fn hash(raw: &str) -> FingerprintToken {
        let normalized = SerialNormalizer::normalize(raw);
        Self::hash_normalized(&normalized)
    }

    /// Fingerprint an identifier that is already normalized
    pub fn hash_normalized(normalized: &str) -> FingerprintToken {
        FingerprintToken::from_hash(Self::fnv1a64(&Self::utf16le_bytes(normalized)))
    }

    /// Fingerprint a raw identifier given as UTF-16 code units
    ///
    /// Unpaired surrogates are dropped before normalization rather than
    /// rejected.
    pub fn hash_wide(raw: &[u16]) -> FingerprintToken {
        Self::hash(&decode_utf16_dropping(raw))
    }

    /// Encode a string as UTF-16 little-endian bytes
    pub fn utf16le_bytes(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    /// FNV-1a 64 over a byte slice
    pub fn fnv1a64(bytes: &[u8]) -> u64 {
        bytes.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
            (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
        })
    }
}

/// Decode UTF-16 code units, silently dropping unpaired surrogates
pub fn decode_utf16_dropping(units: &[u16]) -> String {
    char::decode_utf16(units.iter().copied())
        .filter_map(Result::ok)
        .collect()
}
