use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;
use tracing::debug;

use crate::entry::{
    CompressionMethod, CENTRAL_HEADER_SIG, DOS_EPOCH_DATE, DOS_EPOCH_TIME, EOCD_SIG, FLAG_UTF8,
    LOCAL_HEADER_SIG, VERSION_NEEDED,
};
use crate::error::{ArchiveError, ArchiveResult};

/// An entry queued for writing.
#[derive(Clone, Debug)]
struct PendingEntry {
    name: String,
    data: Vec<u8>,
}

/// Builds a ZIP container in memory.
///
/// Entries are DEFLATE-compressed, falling back to STORED when compression
/// does not shrink them. All entries carry the DOS epoch as their
/// timestamp. ZIP64 is not supported: entries and offsets must fit in
/// 32 bits.
pub struct ZipWriter {
    level: u32,
    entries: Vec<PendingEntry>,
}

impl ZipWriter {
    /// Create a writer using DEFLATE `level` (0-9, clamped).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
            entries: Vec::new(),
        }
    }

    /// Queue an entry.
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> ArchiveResult<()> {
        check_entry_name(name)?;
        self.entries.push(PendingEntry {
            name: name.to_string(),
            data: data.to_vec(),
        });
        Ok(())
    }

    /// Number of entries queued.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the container.
    pub fn finish(self) -> ArchiveResult<Vec<u8>> {
        let entry_count = u16::try_from(self.entries.len())
            .map_err(|_| ArchiveError::TooManyEntries(self.entries.len()))?;

        let mut out = Vec::new();
        let mut central = Vec::new();

        for entry in &self.entries {
            let header_offset = to_u32(out.len() as u64, &entry.name)?;
            let crc = crc32fast::hash(&entry.data);
            let size = to_u32(entry.data.len() as u64, &entry.name)?;

            let deflated = deflate(&entry.data, self.level)?;
            let (method, payload) = if deflated.len() < entry.data.len() {
                (CompressionMethod::Deflated, deflated.as_slice())
            } else {
                (CompressionMethod::Stored, entry.data.as_slice())
            };
            let compressed_size = to_u32(payload.len() as u64, &entry.name)?;
            let name = entry.name.as_bytes();
            let name_len = name.len() as u16;

            // Local file header
            put_u32(&mut out, LOCAL_HEADER_SIG);
            put_u16(&mut out, VERSION_NEEDED);
            put_u16(&mut out, FLAG_UTF8);
            put_u16(&mut out, method.code());
            put_u16(&mut out, DOS_EPOCH_TIME);
            put_u16(&mut out, DOS_EPOCH_DATE);
            put_u32(&mut out, crc);
            put_u32(&mut out, compressed_size);
            put_u32(&mut out, size);
            put_u16(&mut out, name_len);
            put_u16(&mut out, 0); // extra field length
            out.extend_from_slice(name);
            out.extend_from_slice(payload);

            // Central directory header
            put_u32(&mut central, CENTRAL_HEADER_SIG);
            put_u16(&mut central, VERSION_NEEDED); // version made by
            put_u16(&mut central, VERSION_NEEDED);
            put_u16(&mut central, FLAG_UTF8);
            put_u16(&mut central, method.code());
            put_u16(&mut central, DOS_EPOCH_TIME);
            put_u16(&mut central, DOS_EPOCH_DATE);
            put_u32(&mut central, crc);
            put_u32(&mut central, compressed_size);
            put_u32(&mut central, size);
            put_u16(&mut central, name_len);
            put_u16(&mut central, 0); // extra field length
            put_u16(&mut central, 0); // comment length
            put_u16(&mut central, 0); // disk number start
            put_u16(&mut central, 0); // internal attributes
            put_u32(&mut central, 0); // external attributes
            put_u32(&mut central, header_offset);
            central.extend_from_slice(name);

            debug!(
                entry = %entry.name,
                %method,
                size,
                compressed_size,
                "container entry written"
            );
        }

        let central_offset = to_u32(out.len() as u64, "central directory")?;
        let central_size = to_u32(central.len() as u64, "central directory")?;
        out.extend_from_slice(&central);

        // End of central directory record
        put_u32(&mut out, EOCD_SIG);
        put_u16(&mut out, 0); // this disk
        put_u16(&mut out, 0); // disk with central directory
        put_u16(&mut out, entry_count);
        put_u16(&mut out, entry_count);
        put_u32(&mut out, central_size);
        put_u32(&mut out, central_offset);
        put_u16(&mut out, 0); // comment length

        Ok(out)
    }
}

fn deflate(data: &[u8], level: u32) -> ArchiveResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| ArchiveError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| ArchiveError::CompressionFailed(e.to_string()))
}

fn check_entry_name(name: &str) -> ArchiveResult<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.len() > u16::MAX as usize {
        "name exceeds 65535 bytes"
    } else if name.ends_with('/') {
        "name denotes a directory"
    } else {
        return Ok(());
    };
    Err(ArchiveError::InvalidEntryName {
        name: name.to_string(),
        reason: reason.into(),
    })
}

/// Narrow a size or offset to a 32-bit header field.
///
/// `u32::MAX` marks a ZIP64 field, so it is rejected along with anything
/// larger.
fn to_u32(value: u64, name: &str) -> ArchiveResult<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v != u32::MAX)
        .ok_or_else(|| ArchiveError::EntryTooLarge {
            name: name.to_string(),
            size: value,
        })
}

fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}
