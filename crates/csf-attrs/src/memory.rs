//! In-memory attribute store for testing and ephemeral use.
//!
//! [`InMemoryAttributeStore`] keeps the attribute tables of many records in
//! a `HashMap` protected by a `RwLock`. [`RecordAttributes`] is the
//! [`AttributeStore`] view of one record inside it.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use csf_types::RecordId;
use serde_json::Value;
use tracing::debug;

use crate::error::{AttrResult, AttributeError};
use crate::traits::{check_name, AttributeStore};

type AttributeTables = HashMap<RecordId, BTreeMap<String, Value>>;

/// Attribute tables for many records, held in memory.
///
/// Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryAttributeStore {
    tables: RwLock<AttributeTables>,
}

impl InMemoryAttributeStore {
    /// Create a new empty attribute store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty store behind an `Arc`, ready for scoping.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Attribute view confined to `record`.
    pub fn scoped(self: &Arc<Self>, record: RecordId) -> RecordAttributes {
        RecordAttributes {
            store: Arc::clone(self),
            record,
        }
    }

    /// Drop the whole attribute table of `record`.
    pub fn remove_record(&self, record: &RecordId) -> AttrResult<bool> {
        let mut tables = self.tables.write().map_err(|e| {
            AttributeError::Unavailable(format!("lock poisoned: {e}"))
        })?;
        Ok(tables.remove(record).is_some())
    }
}

/// The attributes of one record inside a shared [`InMemoryAttributeStore`].
#[derive(Clone, Debug)]
pub struct RecordAttributes {
    store: Arc<InMemoryAttributeStore>,
    record: RecordId,
}

impl RecordAttributes {
    /// The record this view is confined to.
    pub fn record(&self) -> RecordId {
        self.record
    }
}

impl AttributeStore for RecordAttributes {
    fn get_attribute(&self, name: &str) -> AttrResult<Value> {
        let tables = self.store.tables.read().map_err(|e| {
            AttributeError::Unavailable(format!("lock poisoned: {e}"))
        })?;
        tables
            .get(&self.record)
            .and_then(|table| table.get(name))
            .cloned()
            .ok_or_else(|| AttributeError::NotSet {
                name: name.to_string(),
            })
    }

    fn set_attribute(&self, name: &str, value: Value) -> AttrResult<()> {
        check_name(name)?;

        let mut tables = self.store.tables.write().map_err(|e| {
            AttributeError::Unavailable(format!("lock poisoned: {e}"))
        })?;
        debug!(record = %self.record.short_id(), name, %value, "attribute set");
        tables
            .entry(self.record)
            .or_default()
            .insert(name.to_string(), value);
        Ok(())
    }

    fn delete_attribute(&self, name: &str) -> AttrResult<bool> {
        let mut tables = self.store.tables.write().map_err(|e| {
            AttributeError::Unavailable(format!("lock poisoned: {e}"))
        })?;
        Ok(tables
            .get_mut(&self.record)
            .is_some_and(|table| table.remove(name).is_some()))
    }

    fn attribute_names(&self) -> AttrResult<Vec<String>> {
        let tables = self.store.tables.read().map_err(|e| {
            AttributeError::Unavailable(format!("lock poisoned: {e}"))
        })?;
        Ok(tables
            .get(&self.record)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs() -> RecordAttributes {
        InMemoryAttributeStore::shared().scoped(RecordId::new())
    }

    #[test]
    fn set_and_get() {
        let attrs = attrs();
        attrs.set_attribute("filename", json!("data.zip")).unwrap();
        assert_eq!(attrs.get_attribute("filename").unwrap(), json!("data.zip"));
    }

    #[test]
    fn missing_attribute_is_not_set() {
        let attrs = attrs();
        let err = attrs.get_attribute("filename").unwrap_err();
        assert!(matches!(err, AttributeError::NotSet { ref name } if name == "filename"));
    }

    #[test]
    fn set_replaces_value() {
        let attrs = attrs();
        attrs.set_attribute("filename", json!("a.zip")).unwrap();
        attrs.set_attribute("filename", json!("b.zip")).unwrap();
        assert_eq!(attrs.get_string("filename").unwrap(), "b.zip");
        assert_eq!(attrs.attribute_names().unwrap(), vec!["filename"]);
    }

    #[test]
    fn get_string_rejects_non_strings() {
        let attrs = attrs();
        attrs.set_attribute("filename", json!(42)).unwrap();
        let err = attrs.get_string("filename").unwrap_err();
        assert!(matches!(err, AttributeError::InvalidValue { .. }));
    }

    #[test]
    fn try_get_string_maps_not_set() {
        let attrs = attrs();
        assert_eq!(attrs.try_get_string("filename").unwrap(), None);
        attrs.set_attribute("filename", json!("x.zip")).unwrap();
        assert_eq!(attrs.try_get_string("filename").unwrap().as_deref(), Some("x.zip"));
    }

    #[test]
    fn delete_attribute() {
        let attrs = attrs();
        attrs.set_attribute("filename", json!("x.zip")).unwrap();
        assert!(attrs.delete_attribute("filename").unwrap());
        assert!(!attrs.delete_attribute("filename").unwrap());
        assert!(attrs.attribute_names().unwrap().is_empty());
    }

    #[test]
    fn blank_name_rejected() {
        let attrs = attrs();
        let err = attrs.set_attribute("  ", json!("x")).unwrap_err();
        assert!(matches!(err, AttributeError::InvalidName { .. }));
    }

    #[test]
    fn records_are_isolated() {
        let store = InMemoryAttributeStore::shared();
        let a = store.scoped(RecordId::new());
        let b = store.scoped(RecordId::new());
        a.set_attribute("filename", json!("a.zip")).unwrap();
        assert!(b.try_get_string("filename").unwrap().is_none());

        assert!(store.remove_record(&a.record()).unwrap());
        assert!(a.try_get_string("filename").unwrap().is_none());
    }
}
