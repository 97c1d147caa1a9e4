use crate::error::{StoreError, StoreResult};

/// Record-scoped key/value object repository.
///
/// All implementations must satisfy these invariants:
/// - Keys are scoped to the owning record; `list_keys` never reports keys
///   belonging to another record.
/// - `put` has overwrite semantics.
/// - The repository never interprets object contents.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectRepository: Send + Sync {
    /// Store `data` under `key`, replacing any existing object.
    fn put(&self, key: &str, data: &[u8]) -> StoreResult<()>;

    /// Read the object stored under `key`.
    ///
    /// Returns `Err(StoreError::NotFound)` if the object does not exist.
    fn get(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// All keys stored for this record, sorted.
    fn list_keys(&self) -> StoreResult<Vec<String>>;

    /// Delete an object by key. Returns `true` if the object existed.
    ///
    /// Backends may instead report a missing key as
    /// `Err(StoreError::NotFound)`; callers must accept either.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Check whether an object exists.
    ///
    /// Default implementation scans `list_keys()`.
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.list_keys()?.iter().any(|k| k == key))
    }
}

/// Reject keys that cannot address an object.
pub(crate) fn check_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "key is empty".into(),
        });
    }
    if key.contains('\0') {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "key contains a NUL byte".into(),
        });
    }
    Ok(())
}
