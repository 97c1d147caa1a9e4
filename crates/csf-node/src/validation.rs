//! Consistency checks between a record's `filename` attribute and its
//! object repository.

use thiserror::Error;

/// A violated single-file invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("the filename attribute is not set")]
    FilenameNotSet,

    #[error("repository objects {objects:?} do not match the filename attribute {filename:?}")]
    ObjectMismatch {
        filename: String,
        objects: Vec<String>,
    },

    #[error("node refers to {node:?} but the filename attribute is {attribute:?}")]
    StaleNode { node: String, attribute: String },

    #[error("container {storage_key:?} holds entry {found:?}, expected {expected:?}")]
    EntryMismatch {
        storage_key: String,
        expected: String,
        found: String,
    },
}

/// Checks that a record holds exactly one object, named by its filename
/// attribute.
pub struct SingleFileValidator;

impl SingleFileValidator {
    /// Validate a `filename` attribute against the repository's keys.
    ///
    /// Passes only when `objects == [filename]`. Order of `objects` does
    /// not matter; duplicates count as extra objects.
    pub fn check(filename: Option<&str>, objects: &[String]) -> Result<(), ValidationError> {
        let filename = filename.ok_or(ValidationError::FilenameNotSet)?;
        match objects {
            [only] if only == filename => Ok(()),
            _ => Err(ValidationError::ObjectMismatch {
                filename: filename.to_string(),
                objects: objects.to_vec(),
            }),
        }
    }
}
