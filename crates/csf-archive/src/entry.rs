/// Signature of a local file header.
pub(crate) const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
/// Signature of a central directory file header.
pub(crate) const CENTRAL_HEADER_SIG: u32 = 0x0201_4b50;
/// Signature of the end-of-central-directory record.
pub(crate) const EOCD_SIG: u32 = 0x0605_4b50;

pub(crate) const LOCAL_HEADER_LEN: usize = 30;
pub(crate) const CENTRAL_HEADER_LEN: usize = 46;
pub(crate) const EOCD_LEN: usize = 22;

/// "Version needed to extract": 2.0, the first version with DEFLATE.
pub(crate) const VERSION_NEEDED: u16 = 20;
/// General purpose flag bit 0: entry is encrypted.
pub(crate) const FLAG_ENCRYPTED: u16 = 0x0001;
/// General purpose flag bit 11: name is UTF-8.
pub(crate) const FLAG_UTF8: u16 = 0x0800;

/// DOS date for 1980-01-01, the earliest representable timestamp.
pub(crate) const DOS_EPOCH_DATE: u16 = (1 << 5) | 1;
pub(crate) const DOS_EPOCH_TIME: u16 = 0;

/// Storage method of a container entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    /// Bytes stored verbatim.
    Stored,
    /// Raw DEFLATE stream.
    Deflated,
}

impl CompressionMethod {
    /// Method code in the ZIP headers.
    pub fn code(&self) -> u16 {
        match self {
            Self::Stored => 0,
            Self::Deflated => 8,
        }
    }

    /// Parse a method code. Unsupported methods yield `None`.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Stored),
            8 => Some(Self::Deflated),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stored => write!(f, "stored"),
            Self::Deflated => write!(f, "deflated"),
        }
    }
}

/// One entry of a container, as described by its central directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name (the original key).
    pub name: String,
    /// How the entry's bytes are stored.
    pub method: CompressionMethod,
    /// CRC-32 of the uncompressed bytes.
    pub crc32: u32,
    /// Size of the stored (possibly compressed) bytes.
    pub compressed_size: u64,
    /// Size after extraction.
    pub size: u64,
    /// Offset of the entry's local header in the container.
    pub header_offset: u64,
}

impl ArchiveEntry {
    /// Compressed size as a fraction of the original size.
    ///
    /// Empty entries report `1.0`.
    pub fn ratio(&self) -> f64 {
        if self.size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.size as f64
        }
    }
}
