use tracing::debug;

use crate::entry::ArchiveEntry;
use crate::error::{ArchiveError, ArchiveResult};
use crate::reader::ZipReader;
use crate::writer::ZipWriter;

/// Wraps one byte stream into a single-entry ZIP container and back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compressor {
    level: u32,
}

impl Compressor {
    /// DEFLATE level used by [`Compressor::default`].
    pub const DEFAULT_LEVEL: u32 = 6;

    /// Create a compressor with DEFLATE `level` (0-9, clamped).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }

    /// The DEFLATE level in use.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Build a container whose only entry is `original_key` holding `data`.
    pub fn compress(&self, data: &[u8], original_key: &str) -> ArchiveResult<Vec<u8>> {
        let mut writer = ZipWriter::new(self.level);
        writer.add_entry(original_key, data)?;
        let container = writer.finish()?;
        debug!(
            entry = original_key,
            size = data.len(),
            container_size = container.len(),
            "container built"
        );
        Ok(container)
    }

    /// Extract the entry named `original_key`.
    pub fn extract(&self, container: &[u8], original_key: &str) -> ArchiveResult<Vec<u8>> {
        ZipReader::new(container)?.read_by_name(original_key)
    }

    /// Extract the only entry of a single-entry container, with its name.
    pub fn extract_any(&self, container: &[u8]) -> ArchiveResult<(String, Vec<u8>)> {
        let reader = ZipReader::new(container)?;
        let entry = single_entry(reader.entries())?;
        let data = reader.read_entry(entry)?;
        Ok((entry.name.clone(), data))
    }

    /// Describe every entry of a container without extracting it.
    pub fn list_entries(&self, container: &[u8]) -> ArchiveResult<Vec<ArchiveEntry>> {
        Ok(ZipReader::new(container)?.into_entries())
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEVEL)
    }
}

/// The one entry of `entries`, or the reason there is not exactly one.
pub fn single_entry(entries: &[ArchiveEntry]) -> ArchiveResult<&ArchiveEntry> {
    match entries {
        [] => Err(ArchiveError::EmptyContainer),
        [entry] => Ok(entry),
        many => Err(ArchiveError::MultipleEntries(many.len())),
    }
}
