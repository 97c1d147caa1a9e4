//! Storage key derivation.
//!
//! A source file is stored under two names: the *original key* is the name
//! of the single entry inside the compressed container, and the *storage
//! key* is the name of the container itself in the object repository.

use std::borrow::Cow;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Base name used when a source carries no usable name.
pub const DEFAULT_FILENAME: &str = "file.txt";

/// Extension appended to the stem of the original key.
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "zip";

/// The keys derived for one source file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileKeys {
    /// Entry name inside the container (the source's base name).
    pub original_key: String,
    /// Repository key of the container (stem + archive extension).
    pub storage_key: String,
}

/// Maps source filenames to [`FileKeys`].
///
/// Derivation is pure: the same input always yields the same keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyDeriver {
    extension: Cow<'static, str>,
    default_name: Cow<'static, str>,
}

impl KeyDeriver {
    /// Deriver producing `<stem>.zip` storage keys.
    pub const ZIP: Self = Self {
        extension: Cow::Borrowed(DEFAULT_ARCHIVE_EXTENSION),
        default_name: Cow::Borrowed(DEFAULT_FILENAME),
    };

    /// Create a deriver with a custom archive extension and default name.
    ///
    /// Leading dots on `extension` are ignored, so `".zip"` and `"zip"`
    /// are equivalent. An empty `default_name` falls back to
    /// [`DEFAULT_FILENAME`].
    pub fn new(extension: impl Into<String>, default_name: impl Into<String>) -> Self {
        let extension = extension.into().trim_start_matches('.').to_string();
        let default_name = default_name.into();
        let default_name = base_name(&default_name)
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
        Self {
            extension: Cow::Owned(extension),
            default_name: Cow::Owned(default_name),
        }
    }

    /// The archive extension, without a leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The base name used for nameless sources.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Derive the original and storage keys for a source name or path.
    pub fn derive(&self, name: Option<&str>) -> FileKeys {
        let original_key = name
            .and_then(base_name)
            .unwrap_or(&*self.default_name)
            .to_string();
        let storage_key = self.storage_key_for(&original_key);
        FileKeys {
            original_key,
            storage_key,
        }
    }

    /// Storage key for an already-resolved original key.
    pub fn storage_key_for(&self, original_key: &str) -> String {
        let stem = Path::new(original_key)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(original_key);
        if self.extension.is_empty() {
            stem.to_string()
        } else {
            format!("{stem}.{}", self.extension)
        }
    }
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::ZIP
    }
}

/// Last path component of `name`, or `None` when it has no usable name.
fn base_name(name: &str) -> Option<&str> {
    Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
}
