use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("container corrupt: {0}")]
    ContainerCorrupt(String),

    #[error("entry not found in container: {0}")]
    EntryNotFound(String),

    #[error("container holds {0} entries, expected exactly one")]
    MultipleEntries(usize),

    #[error("container holds no entries")]
    EmptyContainer,

    #[error("invalid entry name {name:?}: {reason}")]
    InvalidEntryName { name: String, reason: String },

    #[error("entry {name} is too large for a container: {size} bytes")]
    EntryTooLarge { name: String, size: u64 },

    #[error("too many entries for a container: {0}")]
    TooManyEntries(usize),

    #[error("compression failed: {0}")]
    CompressionFailed(String),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;

pub(crate) fn corrupt(reason: impl Into<String>) -> ArchiveError {
    ArchiveError::ContainerCorrupt(reason.into())
}
