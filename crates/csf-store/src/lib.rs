//! Object repository interface for compressed single-file records.
//!
//! The object repository is a plain key-to-bytes store owned by the host
//! record system. Each record sees its own keys only; the repository
//! never interprets the bytes it holds.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectRepository`] trait:
//!
//! - [`InMemoryObjectStore`] -- shared `HashMap`-based store for tests and
//!   embedding; [`InMemoryObjectStore::scoped`] hands out a
//!   [`RecordObjects`] view confined to one record
//!
//! # Design Rules
//!
//! 1. Keys are opaque, non-empty strings scoped to one record.
//! 2. `put` overwrites an existing key.
//! 3. `list_keys` returns the record's keys in sorted order.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryObjectStore, RecordObjects};
pub use traits::ObjectRepository;
