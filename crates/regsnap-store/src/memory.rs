use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use regsnap_types::{Hive, RegistryPath, Value, SEPARATOR};

use crate::error::{StoreError, StoreResult};
use crate::traits::{KeyStore, OpenKey, RawValue};

#[derive(Clone, Debug, Default)]
struct MemKey {
    values: Vec<RawValue>,
    subkeys: Vec<(String, MemKey)>,
    deny_open: bool,
    fail_enumeration: bool,
}

impl MemKey {
    fn child(&self, name: &str) -> Option<&MemKey> {
        self.subkeys
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, k)| k)
    }

    fn child_or_insert(&mut self, name: &str) -> &mut MemKey {
        let pos = match self.subkeys.iter().position(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(pos) => pos,
            None => {
                self.subkeys.push((name.to_string(), MemKey::default()));
                self.subkeys.len() - 1
            }
        };
        &mut self.subkeys[pos].1
    }
}

/// In-memory registry.
///
/// Intended for tests and embedding. Keys are created implicitly by
/// [`set_value`](Self::set_value) and [`create_key`](Self::create_key); name
/// lookup is case-insensitive like the native registry. Individual keys can
/// be marked to refuse opening or to fault during enumeration, and the store
/// counts open handles so callers can check that every handle was released.
pub struct InMemoryKeyStore {
    hives: RwLock<HashMap<Hive, MemKey>>,
    open_handles: AtomicUsize,
    peak_handles: AtomicUsize,
}

impl InMemoryKeyStore {
    /// Create a store with every hive present and empty.
    pub fn new() -> Self {
        let hives = Hive::ALL.into_iter().map(|h| (h, MemKey::default())).collect();
        Self {
            hives: RwLock::new(hives),
            open_handles: AtomicUsize::new(0),
            peak_handles: AtomicUsize::new(0),
        }
    }

    /// Create the key at `subpath` (and any missing parents).
    pub fn create_key(&self, hive: Hive, subpath: &str) {
        self.with_key_mut(hive, subpath, |_| {});
    }

    /// Set a value under `subpath`, creating keys as needed.
    ///
    /// Setting an existing name replaces its data in place.
    pub fn set_value(&self, hive: Hive, subpath: &str, name: &str, value: impl Into<Value>) {
        let raw = RawValue::from_value(name, &value.into());
        self.set_raw_value(hive, subpath, raw);
    }

    /// Set a value from its native form.
    pub fn set_raw_value(&self, hive: Hive, subpath: &str, raw: RawValue) {
        self.with_key_mut(hive, subpath, |key| {
            match key.values.iter_mut().find(|v| v.name.eq_ignore_ascii_case(&raw.name)) {
                Some(existing) => *existing = raw,
                None => key.values.push(raw),
            }
        });
    }

    /// Make opening the key at `subpath` fail with `AccessDenied`.
    pub fn deny_access(&self, hive: Hive, subpath: &str) {
        self.with_key_mut(hive, subpath, |key| key.deny_open = true);
    }

    /// Make every enumeration call on the key at `subpath` fail with
    /// `AccessDenied`, including the first.
    pub fn fail_enumeration(&self, hive: Hive, subpath: &str) {
        self.with_key_mut(hive, subpath, |key| key.fail_enumeration = true);
    }

    /// Number of handles currently open.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// Highest number of handles that were open at the same time.
    pub fn peak_handles(&self) -> usize {
        self.peak_handles.load(Ordering::SeqCst)
    }

    fn with_key_mut(&self, hive: Hive, subpath: &str, f: impl FnOnce(&mut MemKey)) {
        let mut hives = self.hives.write().expect("lock poisoned");
        let mut key = hives.entry(hive).or_default();
        for segment in subpath.split(SEPARATOR).filter(|s| !s.is_empty()) {
            key = key.child_or_insert(segment);
        }
        f(key);
    }

    fn acquire(&self) {
        let now = self.open_handles.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_handles.fetch_max(now, Ordering::SeqCst);
    }

    fn release(&self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Default for InMemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStore for InMemoryKeyStore {
    fn open_key(&self, path: &RegistryPath) -> StoreResult<Box<dyn OpenKey + '_>> {
        let hives = self.hives.read().expect("lock poisoned");
        let mut key = hives
            .get(&path.hive())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

        for segment in path.subpath().split(SEPARATOR).filter(|s| !s.is_empty()) {
            key = key
                .child(segment)
                .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        }

        if key.deny_open {
            return Err(StoreError::AccessDenied(path.to_string()));
        }

        // Each handle carries its own copy of the key's direct contents, so a
        // writer racing a reader changes later opens but not this one.
        let handle = MemKeyHandle {
            store: self,
            path: path.clone(),
            values: key.values.clone(),
            subkeys: key.subkeys.iter().map(|(name, _)| name.clone()).collect(),
            fail_enumeration: key.fail_enumeration,
        };
        self.acquire();
        tracing::trace!(path = %path, open = self.open_handles(), "opened key");
        Ok(Box::new(handle))
    }
}

impl std::fmt::Debug for InMemoryKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKeyStore")
            .field("open_handles", &self.open_handles())
            .finish()
    }
}

struct MemKeyHandle<'a> {
    store: &'a InMemoryKeyStore,
    path: RegistryPath,
    values: Vec<RawValue>,
    subkeys: Vec<String>,
    fail_enumeration: bool,
}

impl MemKeyHandle<'_> {
    fn check(&self) -> StoreResult<()> {
        if self.fail_enumeration {
            Err(StoreError::AccessDenied(self.path.to_string()))
        } else {
            Ok(())
        }
    }
}

impl OpenKey for MemKeyHandle<'_> {
    fn path(&self) -> &RegistryPath {
        &self.path
    }

    fn enum_value(&self, index: u32) -> StoreResult<Option<RawValue>> {
        self.check()?;
        Ok(self.values.get(index as usize).cloned())
    }

    fn enum_subkey(&self, index: u32) -> StoreResult<Option<String>> {
        self.check()?;
        Ok(self.subkeys.get(index as usize).cloned())
    }
}

impl Drop for MemKeyHandle<'_> {
    fn drop(&mut self) {
        self.store.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> RegistryPath {
        RegistryPath::parse(s).unwrap()
    }

    // -----------------------------------------------------------------------
    // Opening
    // -----------------------------------------------------------------------

    #[test]
    fn hive_roots_always_open() {
        let store = InMemoryKeyStore::new();
        for hive in Hive::ALL {
            let key = store.open_key(&RegistryPath::hive_root(hive)).unwrap();
            assert!(key.values().next().is_none());
            assert!(key.subkeys().next().is_none());
        }
    }

    #[test]
    fn missing_key_is_not_found() {
        let store = InMemoryKeyStore::new();
        let err = store.open_key(&path(r"HKCU\Nope")).err().unwrap();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(err.is_unopenable());
    }

    #[test]
    fn denied_key_is_access_denied() {
        let store = InMemoryKeyStore::new();
        store.deny_access(Hive::LocalMachine, r"SAM\SAM");
        let err = store.open_key(&path(r"HKLM\SAM\SAM")).err().unwrap();
        assert!(matches!(err, StoreError::AccessDenied(_)));
        // The parent is still readable.
        assert!(store.open_key(&path(r"HKLM\SAM")).is_ok());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let store = InMemoryKeyStore::new();
        store.set_value(Hive::CurrentUser, r"Software\Vendor", "Ver", "1.0");
        let key = store.open_key(&path(r"HKCU\SOFTWARE\vendor")).unwrap();
        let values: Vec<_> = key.values().collect::<StoreResult<_>>().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].decode(), Value::from("1.0"));
    }

    // -----------------------------------------------------------------------
    // Enumeration
    // -----------------------------------------------------------------------

    #[test]
    fn enumerates_in_insertion_order() {
        let store = InMemoryKeyStore::new();
        store.set_value(Hive::CurrentUser, "App", "b", 2u32);
        store.set_value(Hive::CurrentUser, "App", "a", 1u32);
        store.create_key(Hive::CurrentUser, r"App\Zeta");
        store.create_key(Hive::CurrentUser, r"App\Alpha");

        let key = store.open_key(&path(r"HKCU\App")).unwrap();
        let names: Vec<String> = key.values().map(|v| v.unwrap().name).collect();
        assert_eq!(names, vec!["b", "a"]);
        let subkeys: Vec<String> = key.subkeys().collect::<StoreResult<_>>().unwrap();
        assert_eq!(subkeys, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn set_value_replaces_existing() {
        let store = InMemoryKeyStore::new();
        store.set_value(Hive::CurrentUser, "App", "Ver", "1.0");
        store.set_value(Hive::CurrentUser, "App", "ver", "2.0");
        let key = store.open_key(&path(r"HKCU\App")).unwrap();
        assert_eq!(key.enum_value(0).unwrap().unwrap().decode(), Value::from("2.0"));
        assert!(key.enum_value(1).unwrap().is_none());
    }

    #[test]
    fn enumeration_fault_on_first_call() {
        let store = InMemoryKeyStore::new();
        store.set_value(Hive::CurrentUser, "Locked", "x", 1u32);
        store.fail_enumeration(Hive::CurrentUser, "Locked");
        let key = store.open_key(&path(r"HKCU\Locked")).unwrap();
        assert!(matches!(key.enum_value(0), Err(StoreError::AccessDenied(_))));
        assert!(matches!(key.subkeys().next(), Some(Err(StoreError::AccessDenied(_)))));
    }

    #[test]
    fn handle_sees_contents_at_open_time() {
        let store = InMemoryKeyStore::new();
        store.set_value(Hive::CurrentUser, "App", "a", 1u32);
        let key = store.open_key(&path(r"HKCU\App")).unwrap();
        store.set_value(Hive::CurrentUser, "App", "b", 2u32);
        assert_eq!(key.values().count(), 1);
    }

    // -----------------------------------------------------------------------
    // Handle accounting
    // -----------------------------------------------------------------------

    #[test]
    fn handles_released_on_drop() {
        let store = InMemoryKeyStore::new();
        store.create_key(Hive::Users, "A");
        {
            let _a = store.open_key(&path(r"HKU\A")).unwrap();
            let _b = store.open_key(&path("HKU")).unwrap();
            assert_eq!(store.open_handles(), 2);
        }
        assert_eq!(store.open_handles(), 0);
        assert_eq!(store.peak_handles(), 2);
    }

    #[test]
    fn failed_open_holds_no_handle() {
        let store = InMemoryKeyStore::new();
        let _ = store.open_key(&path(r"HKU\Missing"));
        assert_eq!(store.open_handles(), 0);
        assert_eq!(store.peak_handles(), 0);
    }
}
