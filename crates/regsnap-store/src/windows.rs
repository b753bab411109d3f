//! Live registry backend over the Win32 registry API.

use std::io;

use regsnap_types::{Hive, RegistryPath, ValueKind};
use winreg::enums::{
    HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, HKEY_USERS,
    KEY_READ,
};
use winreg::RegKey;

use crate::error::{StoreError, StoreResult};
use crate::traits::{KeyStore, OpenKey, RawValue};

/// The registry of the machine this process runs on.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowsRegistry;

impl WindowsRegistry {
    pub fn new() -> Self {
        Self
    }
}

fn hive_root(hive: Hive) -> RegKey {
    RegKey::predef(match hive {
        Hive::ClassesRoot => HKEY_CLASSES_ROOT,
        Hive::CurrentUser => HKEY_CURRENT_USER,
        Hive::LocalMachine => HKEY_LOCAL_MACHINE,
        Hive::Users => HKEY_USERS,
        Hive::CurrentConfig => HKEY_CURRENT_CONFIG,
    })
}

fn classify(err: io::Error, path: &RegistryPath) -> StoreError {
    match err.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
        io::ErrorKind::PermissionDenied => StoreError::AccessDenied(path.to_string()),
        _ => StoreError::Io(err),
    }
}

impl KeyStore for WindowsRegistry {
    fn open_key(&self, path: &RegistryPath) -> StoreResult<Box<dyn OpenKey + '_>> {
        let root = hive_root(path.hive());
        let key = if path.is_hive_root() {
            root
        } else {
            root.open_subkey_with_flags(path.subpath(), KEY_READ)
                .map_err(|e| classify(e, path))?
        };
        tracing::trace!(path = %path, "opened registry key");
        Ok(Box::new(WindowsKey {
            key,
            path: path.clone(),
        }))
    }
}

/// An open `HKEY`; `RegKey` closes it on drop.
struct WindowsKey {
    key: RegKey,
    path: RegistryPath,
}

impl OpenKey for WindowsKey {
    fn path(&self) -> &RegistryPath {
        &self.path
    }

    fn enum_value(&self, index: u32) -> StoreResult<Option<RawValue>> {
        match self.key.enum_values().nth(index as usize) {
            None => Ok(None),
            Some(Ok((name, value))) => {
                let kind = ValueKind::from_code(value.vtype as u32);
                Ok(Some(RawValue::new(name, kind, value.bytes)))
            }
            Some(Err(e)) => Err(classify(e, &self.path)),
        }
    }

    fn enum_subkey(&self, index: u32) -> StoreResult<Option<String>> {
        match self.key.enum_keys().nth(index as usize) {
            None => Ok(None),
            Some(Ok(name)) => Ok(Some(name)),
            Some(Err(e)) => Err(classify(e, &self.path)),
        }
    }
}
