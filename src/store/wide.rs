//! Wide-string codecs for raw registry data
//!
//! Registry strings are NUL-terminated UTF-16LE. A multi-string is a sequence
//! of such strings closed by an empty one.

use crate::fingerprinting::decode_utf16_dropping;

fn units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Decode `REG_SZ` data, stopping at the first NUL
pub fn decode_sz(bytes: &[u8]) -> String {
    let units = units(bytes);
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    decode_utf16_dropping(&units[..end])
}

/// Decode `REG_MULTI_SZ` data
///
/// Reading stops at the first empty string. Unpaired surrogates are dropped.
pub fn decode_multi_sz(bytes: &[u8]) -> Vec<String> {
    units(bytes)
        .split(|&u| u == 0)
        .take_while(|part| !part.is_empty())
        .map(decode_utf16_dropping)
        .collect()
}

/// Encode `REG_MULTI_SZ` data
///
/// Empty entries are skipped, since they would terminate the list early.
pub fn encode_multi_sz<S: AsRef<str>>(items: &[S]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for item in items.iter().map(AsRef::as_ref).filter(|s| !s.is_empty()) {
        bytes.extend(item.encode_utf16().flat_map(u16::to_le_bytes));
        bytes.extend([0, 0]);
    }
    bytes.extend([0, 0]);
    bytes
}
