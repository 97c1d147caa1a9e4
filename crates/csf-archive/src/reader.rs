use std::io::Read;

use flate2::read::DeflateDecoder;

use crate::entry::{
    ArchiveEntry, CompressionMethod, CENTRAL_HEADER_LEN, CENTRAL_HEADER_SIG, EOCD_LEN, EOCD_SIG,
    FLAG_ENCRYPTED, LOCAL_HEADER_LEN, LOCAL_HEADER_SIG,
};
use crate::error::{corrupt, ArchiveError, ArchiveResult};

/// Longest comment an end-of-central-directory record can carry.
const MAX_COMMENT_LEN: usize = u16::MAX as usize;

/// Reads entries from a ZIP container held in memory.
///
/// The central directory is parsed up front; entry data is decompressed on
/// demand and checked against the recorded size and CRC-32.
#[derive(Debug)]
pub struct ZipReader<'a> {
    data: &'a [u8],
    entries: Vec<ArchiveEntry>,
}

impl<'a> ZipReader<'a> {
    /// Parse the central directory of `data`.
    pub fn new(data: &'a [u8]) -> ArchiveResult<Self> {
        let eocd = find_eocd(data)?;

        let this_disk = read_u16(data, eocd + 4)?;
        let central_disk = read_u16(data, eocd + 6)?;
        if this_disk != 0 || central_disk != 0 {
            return Err(corrupt("multi-disk containers are not supported"));
        }
        let disk_entries = read_u16(data, eocd + 8)?;
        let total_entries = read_u16(data, eocd + 10)?;
        let central_size = read_u32(data, eocd + 12)? as usize;
        let central_offset = read_u32(data, eocd + 16)?;
        if total_entries == u16::MAX || central_offset == u32::MAX {
            return Err(corrupt("ZIP64 containers are not supported"));
        }
        if disk_entries != total_entries {
            return Err(corrupt(format!(
                "entry count mismatch: {disk_entries} on disk, {total_entries} total"
            )));
        }
        let central_offset = central_offset as usize;
        let central_end = central_offset
            .checked_add(central_size)
            .filter(|end| *end <= eocd)
            .ok_or_else(|| corrupt("central directory extends past its end record"))?;

        let mut entries = Vec::with_capacity(total_entries as usize);
        let mut pos = central_offset;
        for _ in 0..total_entries {
            let (entry, next) = parse_central_header(data, pos)?;
            if next > central_end {
                return Err(corrupt(format!(
                    "central header at offset {pos} overruns the central directory"
                )));
            }
            entries.push(entry);
            pos = next;
        }

        Ok(Self { data, entries })
    }

    /// All entries, in central directory order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Consume the reader, keeping only the entry list.
    pub fn into_entries(self) -> Vec<ArchiveEntry> {
        self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the container has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by name.
    pub fn find(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Extract the entry called `name`.
    pub fn read_by_name(&self, name: &str) -> ArchiveResult<Vec<u8>> {
        let entry = self
            .find(name)
            .ok_or_else(|| ArchiveError::EntryNotFound(name.to_string()))?;
        self.read_entry(entry)
    }

    /// Extract and verify one entry.
    pub fn read_entry(&self, entry: &ArchiveEntry) -> ArchiveResult<Vec<u8>> {
        let offset = entry.header_offset as usize;
        if read_u32(self.data, offset)? != LOCAL_HEADER_SIG {
            return Err(corrupt(format!(
                "missing local header for {} at offset {offset}",
                entry.name
            )));
        }
        let name_len = read_u16(self.data, offset + 26)? as usize;
        let extra_len = read_u16(self.data, offset + 28)? as usize;
        let start = offset + LOCAL_HEADER_LEN + name_len + extra_len;
        let payload = slice_at(self.data, start, entry.compressed_size as usize)?;

        let data = match entry.method {
            CompressionMethod::Stored => payload.to_vec(),
            CompressionMethod::Deflated => inflate(payload, entry)?,
        };

        if data.len() as u64 != entry.size {
            return Err(corrupt(format!(
                "size mismatch for {}: expected {}, got {}",
                entry.name,
                entry.size,
                data.len()
            )));
        }
        let actual_crc = crc32fast::hash(&data);
        if actual_crc != entry.crc32 {
            return Err(corrupt(format!(
                "CRC-32 mismatch for {}: expected {:08x}, got {actual_crc:08x}",
                entry.name, entry.crc32
            )));
        }
        Ok(data)
    }
}

fn inflate(payload: &[u8], entry: &ArchiveEntry) -> ArchiveResult<Vec<u8>> {
    // Read one byte past the declared size so oversized streams are caught
    // without inflating them completely.
    let mut decoder = DeflateDecoder::new(payload).take(entry.size.saturating_add(1));
    let mut out = Vec::with_capacity(entry.size.min(1 << 20) as usize);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| corrupt(format!("cannot inflate {}: {e}", entry.name)))?;
    Ok(out)
}

/// Locate the end-of-central-directory record, scanning back over a
/// possible trailing comment.
fn find_eocd(data: &[u8]) -> ArchiveResult<usize> {
    if data.len() < EOCD_LEN {
        return Err(corrupt(format!(
            "{} bytes is too short for a container",
            data.len()
        )));
    }
    let last = data.len() - EOCD_LEN;
    let first = last.saturating_sub(MAX_COMMENT_LEN);
    let sig = EOCD_SIG.to_le_bytes();
    (first..=last)
        .rev()
        .find(|&pos| data[pos..pos + 4] == sig)
        .ok_or_else(|| corrupt("end of central directory record not found"))
}

fn parse_central_header(data: &[u8], pos: usize) -> ArchiveResult<(ArchiveEntry, usize)> {
    if read_u32(data, pos)? != CENTRAL_HEADER_SIG {
        return Err(corrupt(format!("bad central header signature at offset {pos}")));
    }
    let flags = read_u16(data, pos + 8)?;
    let method_code = read_u16(data, pos + 10)?;
    let crc32 = read_u32(data, pos + 16)?;
    let compressed_size = read_u32(data, pos + 20)?;
    let size = read_u32(data, pos + 24)?;
    let name_len = read_u16(data, pos + 28)? as usize;
    let extra_len = read_u16(data, pos + 30)? as usize;
    let comment_len = read_u16(data, pos + 32)? as usize;
    let header_offset = read_u32(data, pos + 42)?;
    let name_bytes = slice_at(data, pos + CENTRAL_HEADER_LEN, name_len)?;
    let name = String::from_utf8_lossy(name_bytes).into_owned();

    if flags & FLAG_ENCRYPTED != 0 {
        return Err(corrupt(format!("entry {name} is encrypted")));
    }
    if compressed_size == u32::MAX || size == u32::MAX || header_offset == u32::MAX {
        return Err(corrupt(format!("entry {name} uses ZIP64 fields")));
    }
    let method = CompressionMethod::from_code(method_code).ok_or_else(|| {
        corrupt(format!("entry {name} uses unsupported method {method_code}"))
    })?;

    let next = pos + CENTRAL_HEADER_LEN + name_len + extra_len + comment_len;
    let entry = ArchiveEntry {
        name,
        method,
        crc32,
        compressed_size: compressed_size as u64,
        size: size as u64,
        header_offset: header_offset as u64,
    };
    Ok((entry, next))
}

fn slice_at(data: &[u8], pos: usize, len: usize) -> ArchiveResult<&[u8]> {
    pos.checked_add(len)
        .and_then(|end| data.get(pos..end))
        .ok_or_else(|| corrupt(format!("truncated: need {len} bytes at offset {pos}")))
}

fn read_u16(data: &[u8], pos: usize) -> ArchiveResult<u16> {
    let b = slice_at(data, pos, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], pos: usize) -> ArchiveResult<u32> {
    let b = slice_at(data, pos, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}
