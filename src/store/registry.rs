//! Registry Store - Windows registry backend
//!
//! Binds the store seam to `HKEY_LOCAL_MACHINE`. Each call opens its key with
//! only the access it needs and drops the handle before returning.

use std::io;

use tracing::trace;
use winreg::enums::{RegType, HKEY_LOCAL_MACHINE, KEY_QUERY_VALUE, KEY_SET_VALUE};
use winreg::{RegKey, RegValue};

use super::wide::{decode_multi_sz, decode_sz, encode_multi_sz};
use super::{ConfigStore, StorePath, StoreValue};
use crate::errors::{StoreError, StoreOperation};

/// Windows registry store implementation, rooted at `HKEY_LOCAL_MACHINE`
#[derive(Debug, Default)]
pub struct RegistryStore;

impl RegistryStore {
    /// Store rooted at `HKEY_LOCAL_MACHINE`
    pub fn local_machine() -> Self {
        Self
    }

    fn to_store_value(raw: RegValue) -> StoreValue {
        match raw.vtype {
            RegType::REG_SZ => StoreValue::String(decode_sz(&raw.bytes)),
            RegType::REG_EXPAND_SZ => StoreValue::ExpandString(decode_sz(&raw.bytes)),
            RegType::REG_MULTI_SZ => StoreValue::MultiString(decode_multi_sz(&raw.bytes)),
            RegType::REG_DWORD if raw.bytes.len() == 4 => StoreValue::Dword(u32::from_le_bytes([
                raw.bytes[0],
                raw.bytes[1],
                raw.bytes[2],
                raw.bytes[3],
            ])),
            RegType::REG_QWORD if raw.bytes.len() == 8 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&raw.bytes);
                StoreValue::Qword(u64::from_le_bytes(buf))
            }
            RegType::REG_BINARY => StoreValue::Binary(raw.bytes),
            other => StoreValue::Other {
                type_id: other as u32,
                bytes: raw.bytes,
            },
        }
    }

    fn to_reg_value(value: &StoreValue) -> RegValue {
        match value {
            StoreValue::String(s) => RegValue {
                bytes: encode_sz(s),
                vtype: RegType::REG_SZ,
            },
            StoreValue::ExpandString(s) => RegValue {
                bytes: encode_sz(s),
                vtype: RegType::REG_EXPAND_SZ,
            },
            StoreValue::MultiString(items) => RegValue {
                bytes: encode_multi_sz(items),
                vtype: RegType::REG_MULTI_SZ,
            },
            StoreValue::Dword(v) => RegValue {
                bytes: v.to_le_bytes().to_vec(),
                vtype: RegType::REG_DWORD,
            },
            StoreValue::Qword(v) => RegValue {
                bytes: v.to_le_bytes().to_vec(),
                vtype: RegType::REG_QWORD,
            },
            StoreValue::Binary(bytes) => RegValue {
                bytes: bytes.clone(),
                vtype: RegType::REG_BINARY,
            },
            StoreValue::Other { bytes, .. } => RegValue {
                bytes: bytes.clone(),
                vtype: RegType::REG_NONE,
            },
        }
    }
}

fn encode_sz(s: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = s.encode_utf16().flat_map(u16::to_le_bytes).collect();
    bytes.extend([0, 0]);
    bytes
}

impl ConfigStore for RegistryStore {
    fn get(&self, path: &StorePath, name: &str) -> Result<Option<StoreValue>, StoreError> {
        let key_path = path.to_string();
        let hive = RegKey::predef(HKEY_LOCAL_MACHINE);

        let key = match hive.open_subkey_with_flags(&key_path, KEY_QUERY_VALUE) {
            Ok(key) => key,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!(path = %key_path, "registry key absent");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::from_io(key_path, StoreOperation::Read, e)),
        };
        trace!(path = %key_path, "registry key opened for read");

        match key.get_raw_value(name) {
            Ok(raw) => Ok(Some(Self::to_store_value(raw))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::from_io(key_path, StoreOperation::Read, e)),
        }
    }

    fn set(&self, path: &StorePath, name: &str, value: &StoreValue) -> Result<(), StoreError> {
        let key_path = path.to_string();
        let hive = RegKey::predef(HKEY_LOCAL_MACHINE);

        let (key, _disposition) = hive
            .create_subkey_with_flags(&key_path, KEY_SET_VALUE)
            .map_err(|e| StoreError::from_io(key_path.clone(), StoreOperation::Write, e))?;
        trace!(path = %key_path, "registry key opened for write");

        key.set_raw_value(name, &Self::to_reg_value(value))
            .map_err(|e| StoreError::from_io(key_path, StoreOperation::Write, e))
    }

    fn backend_name(&self) -> &'static str {
        "registry"
    }
}
