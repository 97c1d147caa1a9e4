//! Compressed single-file record node.
//!
//! A [`CompressedFileNode`] attaches exactly one file to a record. The
//! file is stored as a single-entry ZIP container in the record's object
//! repository, and the record's `filename` attribute names that container.
//! Reads decompress transparently.
//!
//! The node composes four pieces:
//!
//! - [`csf_types::KeyDeriver`] -- original and storage keys from a filename
//! - [`csf_archive::Compressor`] -- container build and extraction
//! - [`csf_store::ObjectRepository`] -- the record's objects (external)
//! - [`csf_attrs::AttributeStore`] -- the record's attributes (external)
//!
//! and checks the single-object invariant with [`SingleFileValidator`].

pub mod config;
pub mod error;
pub mod node;
pub mod source;
pub mod validation;

pub use config::NodeConfig;
pub use error::{NodeError, NodeResult};
pub use node::{CompressedFileNode, NodeState};
pub use source::FileSource;
pub use validation::{SingleFileValidator, ValidationError};

// Re-export key types
pub use csf_archive::{ArchiveEntry, ArchiveError, Compressor};
pub use csf_attrs::{AttributeStore, InMemoryAttributeStore};
pub use csf_store::{InMemoryObjectStore, ObjectRepository};
pub use csf_types::{FileKeys, KeyDeriver, RecordId};
