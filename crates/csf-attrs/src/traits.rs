//! The [`AttributeStore`] trait defining the attribute storage interface.

use serde_json::Value;

use crate::error::{AttrResult, AttributeError};

/// Storage backend for the named attributes of one record.
///
/// Implementations must be thread-safe (`Send + Sync`) and provide atomic
/// get/set/delete operations on individual attributes.
pub trait AttributeStore: Send + Sync {
    /// Read an attribute.
    ///
    /// Returns `Err(AttributeError::NotSet)` if the attribute is absent.
    fn get_attribute(&self, name: &str) -> AttrResult<Value>;

    /// Create or replace an attribute.
    fn set_attribute(&self, name: &str, value: Value) -> AttrResult<()>;

    /// Remove an attribute. Returns `true` if it was set.
    fn delete_attribute(&self, name: &str) -> AttrResult<bool>;

    /// Names of all attributes currently set, sorted.
    fn attribute_names(&self) -> AttrResult<Vec<String>>;

    /// Read an attribute that must hold a string.
    fn get_string(&self, name: &str) -> AttrResult<String> {
        match self.get_attribute(name)? {
            Value::String(s) => Ok(s),
            other => Err(AttributeError::InvalidValue {
                name: name.to_string(),
                reason: format!("expected a string, got {other}"),
            }),
        }
    }

    /// Read a string attribute, mapping "not set" to `None`.
    fn try_get_string(&self, name: &str) -> AttrResult<Option<String>> {
        match self.get_string(name) {
            Ok(s) => Ok(Some(s)),
            Err(AttributeError::NotSet { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Reject attribute names that cannot be stored.
pub(crate) fn check_name(name: &str) -> AttrResult<()> {
    if name.trim().is_empty() {
        return Err(AttributeError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
