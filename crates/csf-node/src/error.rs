use std::path::PathBuf;

use csf_archive::ArchiveError;
use csf_attrs::AttributeError;
use csf_store::StoreError;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("path `{}` is not absolute", .0.display())]
    InvalidPath(PathBuf),

    #[error("path `{}` does not correspond to an existing file", .0.display())]
    FileNotFound(PathBuf),

    #[error("no file is attached to this node")]
    NotSet,

    #[error("object not found in repository: {0}")]
    ObjectNotFound(String),

    #[error("attribute not set: {0}")]
    AttributeNotSet(String),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("content is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("attribute error: {0}")]
    Attribute(AttributeError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for NodeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => Self::ObjectNotFound(key),
            other => Self::Store(other),
        }
    }
}

impl From<AttributeError> for NodeError {
    fn from(err: AttributeError) -> Self {
        match err {
            AttributeError::NotSet { name } => Self::AttributeNotSet(name),
            other => Self::Attribute(other),
        }
    }
}

pub type NodeResult<T> = Result<T, NodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_is_lifted() {
        let err: NodeError = StoreError::NotFound("data.zip".into()).into();
        assert!(matches!(err, NodeError::ObjectNotFound(ref k) if k == "data.zip"));
    }

    #[test]
    fn other_store_errors_are_wrapped() {
        let err: NodeError = StoreError::Unavailable("down".into()).into();
        assert!(matches!(err, NodeError::Store(_)));
    }

    #[test]
    fn attribute_not_set_is_lifted() {
        let err: NodeError = AttributeError::NotSet {
            name: "filename".into(),
        }
        .into();
        assert!(matches!(err, NodeError::AttributeNotSet(ref n) if n == "filename"));
    }

    #[test]
    fn path_errors_display_the_path() {
        let err = NodeError::InvalidPath(PathBuf::from("relative/path.txt"));
        assert_eq!(err.to_string(), "path `relative/path.txt` is not absolute");
    }
}
