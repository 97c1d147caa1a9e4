//! Record attribute storage for compressed single-file records.
//!
//! Attributes are the small named values a host record system persists
//! alongside each record. A compressed file node keeps exactly one of
//! them, `filename`, pointing at its stored container.
//!
//! # Modules
//!
//! - [`error`] -- Error types for attribute operations
//! - [`traits`] -- The [`AttributeStore`] trait defining the storage interface
//! - [`memory`] -- In-memory [`InMemoryAttributeStore`] for tests

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{AttrResult, AttributeError};
pub use memory::{InMemoryAttributeStore, RecordAttributes};
pub use traits::AttributeStore;
