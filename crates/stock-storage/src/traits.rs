use crate::error::{StorageError, StorageResult};

/// A string-valued key-value medium with named slots.
///
/// All implementations must satisfy these invariants:
/// - `set` overwrites any previous value under the key in one step.
/// - `get` after a successful `set` returns exactly the value written.
/// - Missing keys are `Ok(None)`, not errors.
/// - Backend I/O errors are propagated; callers decide whether to swallow them.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the slot has never been written or was removed.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove the value under `key`. Returns `true` if a value existed.
    fn remove(&self, key: &str) -> StorageResult<bool>;

    /// Check whether a value is stored under `key`.
    ///
    /// Default implementation reads the value. Backends may override with a
    /// cheaper existence check.
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Check that `key` can name a storage slot on every backend.
///
/// Keys must be non-empty and made of ASCII letters, digits, `-`, `_` or
/// `.`, and may not start with a dot. This keeps file-backed slots inside
/// their data directory.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let invalid = |reason: &str| StorageError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if key.is_empty() {
        return Err(invalid("key must not be empty"));
    }
    if key.starts_with('.') {
        return Err(invalid("key must not start with '.'"));
    }
    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(&format!("unsupported character {c:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_default_key() {
        assert!(validate_key("leatherStock").is_ok());
        assert!(validate_key("stock-2024_backup.v1").is_ok());
    }

    #[test]
    fn rejects_empty_and_traversal_keys() {
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey { .. })));
        assert!(validate_key("..").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("a b").is_err());
        assert!(validate_key("çanta").is_err());
    }
}
