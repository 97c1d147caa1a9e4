use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use csf_types::RecordId;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_key, ObjectRepository};

type RecordMap = HashMap<RecordId, BTreeMap<String, Vec<u8>>>;

/// In-memory object store shared by many records.
///
/// Intended for tests and embedding. Objects are grouped per [`RecordId`]
/// behind a `RwLock`; use [`InMemoryObjectStore::scoped`] to obtain the
/// [`ObjectRepository`] view of a single record. Objects are cloned on
/// read/write.
pub struct InMemoryObjectStore {
    records: RwLock<RecordMap>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new empty store behind an `Arc`, ready for scoping.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Repository view confined to the keys of `record`.
    pub fn scoped(self: &Arc<Self>, record: RecordId) -> RecordObjects {
        RecordObjects {
            store: Arc::clone(self),
            record,
        }
    }

    /// Total number of objects across all records.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .expect("lock poisoned")
            .values()
            .map(BTreeMap::len)
            .sum()
    }

    /// Returns `true` if no record holds any object.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.records
            .read()
            .expect("lock poisoned")
            .values()
            .flat_map(BTreeMap::values)
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Number of records that currently own at least one object.
    pub fn record_count(&self) -> usize {
        self.records
            .read()
            .expect("lock poisoned")
            .values()
            .filter(|objects| !objects.is_empty())
            .count()
    }

    /// Drop every object owned by `record`. Returns how many were removed.
    ///
    /// Models deletion of the owning record: its objects go with it.
    pub fn remove_record(&self, record: &RecordId) -> usize {
        let removed = self
            .records
            .write()
            .expect("lock poisoned")
            .remove(record)
            .map(|objects| objects.len())
            .unwrap_or(0);
        debug!(record = %record, removed, "record objects dropped");
        removed
    }

    fn read_map(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, RecordMap>> {
        self.records
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn write_map(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, RecordMap>> {
        self.records
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("record_count", &self.record_count())
            .field("object_count", &self.len())
            .finish()
    }
}

/// The objects of one record inside a shared [`InMemoryObjectStore`].
#[derive(Clone, Debug)]
pub struct RecordObjects {
    store: Arc<InMemoryObjectStore>,
    record: RecordId,
}

impl RecordObjects {
    /// The record this view is confined to.
    pub fn record(&self) -> RecordId {
        self.record
    }

    /// The shared store backing this view.
    pub fn store(&self) -> &Arc<InMemoryObjectStore> {
        &self.store
    }
}

impl ObjectRepository for RecordObjects {
    fn put(&self, key: &str, data: &[u8]) -> StoreResult<()> {
        check_key(key)?;
        let mut map = self.store.write_map()?;
        map.entry(self.record)
            .or_default()
            .insert(key.to_string(), data.to_vec());
        debug!(record = %self.record.short_id(), key, len = data.len(), "object put");
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let map = self.store.read_map()?;
        map.get(&self.record)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn list_keys(&self) -> StoreResult<Vec<String>> {
        let map = self.store.read_map()?;
        Ok(map
            .get(&self.record)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.store.write_map()?;
        let existed = map
            .get_mut(&self.record)
            .map(|objects| objects.remove(key).is_some())
            .unwrap_or(false);
        debug!(record = %self.record.short_id(), key, existed, "object delete");
        Ok(existed)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        let map = self.store.read_map()?;
        Ok(map
            .get(&self.record)
            .is_some_and(|objects| objects.contains_key(key)))
    }
}
