//! Single-entry ZIP containers for compressed single-file records.
//!
//! A stored file is wrapped in a standard PKZIP container so that it stays
//! inspectable with generic archive tools, while the record only ever
//! holds one object.
//!
//! # Architecture
//!
//! - **ZipWriter**: builds containers in memory (DEFLATE, STORED fallback)
//! - **ZipReader**: parses the central directory and extracts entries,
//!   verifying size and CRC-32
//! - **Compressor**: the single-entry view used by record nodes
//!   (`compress`, `extract`, `extract_any`, `list_entries`)
//!
//! ZIP64, multi-disk and encrypted containers are rejected as corrupt.

pub mod compressor;
pub mod entry;
pub mod error;
pub mod reader;
pub mod writer;

pub use compressor::{single_entry, Compressor};
pub use entry::{ArchiveEntry, CompressionMethod};
pub use error::{ArchiveError, ArchiveResult};
pub use reader::ZipReader;
pub use writer::ZipWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_reader_roundtrip_multiple() {
        let mut writer = ZipWriter::new(6);
        for i in 0..10 {
            writer
                .add_entry(&format!("file-{i}.txt"), format!("content-{i}").as_bytes())
                .unwrap();
        }
        assert_eq!(writer.len(), 10);
        let bytes = writer.finish().unwrap();

        let reader = ZipReader::new(&bytes).unwrap();
        assert_eq!(reader.len(), 10);
        for i in 0..10 {
            let data = reader.read_by_name(&format!("file-{i}.txt")).unwrap();
            assert_eq!(data, format!("content-{i}").as_bytes());
        }
    }

    #[test]
    fn compressor_output_is_readable_by_reader() {
        let container = Compressor::default()
            .compress(b"hello world", "hello.txt")
            .unwrap();
        let reader = ZipReader::new(&container).unwrap();
        let entry = single_entry(reader.entries()).unwrap();
        assert_eq!(entry.name, "hello.txt");
        assert_eq!(reader.read_entry(entry).unwrap(), b"hello world");
    }

    #[test]
    fn truncated_payload_is_corrupt() {
        let data = vec![0xABu8; 100_000];
        let container = Compressor::default().compress(&data, "big.bin").unwrap();
        // Chop the container in half: the end record is gone.
        let err = Compressor::default()
            .extract(&container[..container.len() / 2], "big.bin")
            .unwrap_err();
        assert!(matches!(err, ArchiveError::ContainerCorrupt(_)));
    }
}
