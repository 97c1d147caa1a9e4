//! Foundation types for compressed single-file records.
//!
//! Every other `csf-*` crate depends on `csf-types`.
//!
//! # Key Types
//!
//! - [`RecordId`] -- UUID v7 identifier of the record a file is attached to
//! - [`KeyDeriver`] -- Maps a source filename to its archive entry name and
//!   its repository storage key
//! - [`FileKeys`] -- The pair of keys produced by a [`KeyDeriver`]

pub mod error;
pub mod identity;
pub mod keys;

pub use error::TypeError;
pub use identity::RecordId;
pub use keys::{FileKeys, KeyDeriver, DEFAULT_ARCHIVE_EXTENSION, DEFAULT_FILENAME};
