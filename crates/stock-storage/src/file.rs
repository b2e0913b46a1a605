//! File-backed storage: one `<key>.json` file per slot.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::traits::{validate_key, KeyValueStorage};

/// Stores each slot as a file inside a data directory.
///
/// Writes land in a temporary file in the same directory and are renamed
/// over the target, so readers see either the previous document or the new
/// one in full.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (or create) a storage directory.
    pub fn open(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The directory holding the slot files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(StorageError::NotText {
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StorageError::Io(e.error))?;
        debug!(path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.path_for(key)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let storage = FileStorage::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(storage.root(), root.as_path());
    }

    #[test]
    fn set_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.set("leatherStock", r#"{"A":{}}"#).unwrap();
        assert_eq!(
            storage.get("leatherStock").unwrap().as_deref(),
            Some(r#"{"A":{}}"#)
        );
        assert!(dir.path().join("leatherStock.json").is_file());
    }

    #[test]
    fn missing_slot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get("leatherStock").unwrap(), None);
        assert!(!storage.contains("leatherStock").unwrap());
    }

    #[test]
    fn set_overwrites_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.set("k", "a much longer first value").unwrap();
        storage.set("k", "short").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("short"));

        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temporary files must not be left behind");
    }

    #[test]
    fn remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.set("k", "v").unwrap();
        assert!(storage.remove("k").unwrap());
        assert!(!storage.remove("k").unwrap());
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn non_utf8_content_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        fs::write(dir.path().join("k.json"), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(storage.get("k"), Err(StorageError::NotText { .. })));
    }

    #[test]
    fn rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(matches!(
            storage.set("../outside", "v"),
            Err(StorageError::InvalidKey { .. })
        ));
    }
}
