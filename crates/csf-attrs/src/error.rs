//! Error types for attribute operations.

use thiserror::Error;

/// Errors that can occur during attribute operations.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// The attribute has never been set for this record.
    #[error("attribute not set: {name}")]
    NotSet { name: String },

    /// The attribute name is not usable.
    #[error("invalid attribute name: {name:?}")]
    InvalidName { name: String },

    /// The attribute holds a value of an unexpected type.
    #[error("attribute {name} has unexpected value: {reason}")]
    InvalidValue { name: String, reason: String },

    /// The backing store is unusable (e.g. a poisoned lock).
    #[error("attribute store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for attribute operations.
pub type AttrResult<T> = std::result::Result<T, AttributeError>;
