use std::iter::FusedIterator;

use regsnap_types::{RegistryPath, Value, ValueKind};

use crate::error::StoreResult;

/// A value exactly as the store returns it: name, native kind, raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawValue {
    pub name: String,
    pub kind: ValueKind,
    pub data: Vec<u8>,
}

impl RawValue {
    pub fn new(name: impl Into<String>, kind: ValueKind, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind,
            data,
        }
    }

    /// Build the native form of a normalized value.
    pub fn from_value(name: impl Into<String>, value: &Value) -> Self {
        Self::new(name, value.kind(), value.encode())
    }

    /// Normalize the payload.
    pub fn decode(&self) -> Value {
        Value::decode(self.kind, &self.data)
    }
}

/// Hierarchical key/value store that can open keys by path.
///
/// Implementations must satisfy these invariants:
/// - Opening never mutates the store.
/// - An opened key stays valid until the returned handle is dropped; dropping
///   it releases whatever native resource backs it.
/// - A key that does not exist fails with `StoreError::NotFound`; a key the
///   caller may not read fails with `StoreError::AccessDenied`.
pub trait KeyStore {
    /// Open the key at `path` for reading.
    fn open_key(&self, path: &RegistryPath) -> StoreResult<Box<dyn OpenKey + '_>>;
}

/// An open key handle.
///
/// Index-based enumeration mirrors the native API: `Ok(None)` means "no more
/// items" and is the only normal terminator. Prefer [`OpenKey::values`] and
/// [`OpenKey::subkeys`], which wrap the index loop in an iterator.
pub trait OpenKey {
    /// The path this handle was opened at.
    fn path(&self) -> &RegistryPath;

    /// The value at `index`, or `None` once the values are exhausted.
    fn enum_value(&self, index: u32) -> StoreResult<Option<RawValue>>;

    /// The subkey name at `index`, or `None` once the subkeys are exhausted.
    fn enum_subkey(&self, index: u32) -> StoreResult<Option<String>>;

    /// Lazily enumerate this key's values.
    fn values(&self) -> Enumeration<'_, RawValue> {
        Enumeration::new(move |index| self.enum_value(index))
    }

    /// Lazily enumerate this key's subkey names.
    fn subkeys(&self) -> Enumeration<'_, String> {
        Enumeration::new(move |index| self.enum_subkey(index))
    }
}

/// A finite, non-restartable sequence over an index-based enumeration.
///
/// Yields `Ok(item)` for each index until the source reports exhaustion, at
/// which point the sequence ends. A fault is yielded once as `Err` and also
/// ends the sequence.
pub struct Enumeration<'a, T> {
    fetch: Box<dyn FnMut(u32) -> StoreResult<Option<T>> + 'a>,
    index: u32,
    finished: bool,
}

impl<'a, T> Enumeration<'a, T> {
    pub fn new(fetch: impl FnMut(u32) -> StoreResult<Option<T>> + 'a) -> Self {
        Self {
            fetch: Box::new(fetch),
            index: 0,
            finished: false,
        }
    }

    /// Number of items yielded so far.
    pub fn position(&self) -> u32 {
        self.index
    }
}

impl<T> Iterator for Enumeration<'_, T> {
    type Item = StoreResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match (self.fetch)(self.index) {
            Ok(Some(item)) => {
                self.index += 1;
                Some(Ok(item))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<T> FusedIterator for Enumeration<'_, T> {}

impl<T> std::fmt::Debug for Enumeration<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enumeration")
            .field("index", &self.index)
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn enumeration_stops_at_exhaustion() {
        let items = ["a", "b", "c"];
        let seq = Enumeration::new(|i| Ok(items.get(i as usize).map(|s| s.to_string())));
        let collected: Vec<String> = seq.collect::<StoreResult<_>>().unwrap();
        assert_eq!(collected, vec!["a", "b", "c"]);
    }

    #[test]
    fn enumeration_empty_source() {
        let mut seq: Enumeration<'_, String> = Enumeration::new(|_| Ok(None));
        assert!(seq.next().is_none());
        assert_eq!(seq.position(), 0);
    }

    #[test]
    fn fault_is_yielded_once_then_ends() {
        let mut calls = 0;
        let mut seq: Enumeration<'_, String> = Enumeration::new(|_| {
            calls += 1;
            Err(StoreError::AccessDenied("k".into()))
        });
        assert!(matches!(seq.next(), Some(Err(StoreError::AccessDenied(_)))));
        assert!(seq.next().is_none());
        assert!(seq.next().is_none());
        drop(seq);
        assert_eq!(calls, 1);
    }

    #[test]
    fn fault_after_items() {
        let seq = Enumeration::new(|i| {
            if i < 2 {
                Ok(Some(i))
            } else {
                Err(StoreError::Fault {
                    path: "k".into(),
                    reason: "boom".into(),
                })
            }
        });
        let results: Vec<_> = seq.collect();
        assert_eq!(results.len(), 3);
        assert!(results[2].is_err());
    }

    #[test]
    fn raw_value_from_normalized() {
        let raw = RawValue::from_value("Ver", &Value::from("1.0"));
        assert_eq!(raw.kind, ValueKind::Sz);
        assert_eq!(raw.decode(), Value::from("1.0"));
    }
}
