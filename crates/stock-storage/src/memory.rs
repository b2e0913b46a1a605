use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StorageError, StorageResult};
use crate::traits::{validate_key, KeyValueStorage};

/// In-memory, HashMap-based key-value storage.
///
/// Intended for tests and embedding. Values are held behind a `RwLock` and
/// cloned on read/write. A store can be switched to read-only to exercise
/// failing writes.
pub struct InMemoryStorage {
    slots: RwLock<HashMap<String, String>>,
    read_only: RwLock<bool>,
}

impl InMemoryStorage {
    /// Create a new empty in-memory storage.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            read_only: RwLock::new(false),
        }
    }

    /// Create a storage pre-populated with one slot.
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .slots
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// Make subsequent writes fail with [`StorageError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.write().expect("lock poisoned") = read_only;
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.read().expect("lock poisoned").is_empty()
    }

    fn check_writable(&self) -> StorageResult<()> {
        let read_only = self
            .read_only
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        if *read_only {
            return Err(StorageError::ReadOnly);
        }
        Ok(())
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        let slots = self
            .slots
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.check_writable()?;
        let mut slots = self
            .slots
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        self.check_writable()?;
        let mut slots = self
            .slots
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(slots.remove(key).is_some())
    }

    fn contains(&self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        let slots = self
            .slots
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(slots.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStorage")
            .field("slot_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let storage = InMemoryStorage::new();
        storage.set("leatherStock", "{}").unwrap();
        assert_eq!(storage.get("leatherStock").unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get("leatherStock").unwrap(), None);
        assert!(!storage.contains("leatherStock").unwrap());
    }

    #[test]
    fn set_overwrites() {
        let storage = InMemoryStorage::with_value("k", "old");
        storage.set("k", "new").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("new"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn remove_reports_existence() {
        let storage = InMemoryStorage::with_value("k", "v");
        assert!(storage.remove("k").unwrap());
        assert!(!storage.remove("k").unwrap());
        assert!(storage.is_empty());
    }

    #[test]
    fn read_only_rejects_writes_but_allows_reads() {
        let storage = InMemoryStorage::with_value("k", "v");
        storage.set_read_only(true);
        assert!(matches!(storage.set("k", "x"), Err(StorageError::ReadOnly)));
        assert!(matches!(storage.remove("k"), Err(StorageError::ReadOnly)));
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));

        storage.set_read_only(false);
        storage.set("k", "x").unwrap();
    }

    #[test]
    fn invalid_key_is_rejected() {
        let storage = InMemoryStorage::new();
        assert!(matches!(
            storage.set("../escape", "v"),
            Err(StorageError::InvalidKey { .. })
        ));
    }
}
