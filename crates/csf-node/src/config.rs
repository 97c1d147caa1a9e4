use csf_archive::Compressor;
use csf_types::{KeyDeriver, DEFAULT_ARCHIVE_EXTENSION, DEFAULT_FILENAME};
use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};

/// Configuration for compressed file nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Extension of storage keys, without the dot.
    pub archive_extension: String,
    /// Base name for sources that carry no name.
    pub default_filename: String,
    /// DEFLATE level, 0-9. Larger values are clamped.
    pub compression_level: u32,
    /// Run `validate()` at the end of every `set_file`.
    pub validate_on_write: bool,
    /// Name of the record attribute holding the storage key.
    pub filename_attribute: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            default_filename: DEFAULT_FILENAME.to_string(),
            compression_level: Compressor::DEFAULT_LEVEL,
            validate_on_write: true,
            filename_attribute: "filename".to_string(),
        }
    }
}

impl NodeConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(input: &str) -> NodeResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| NodeError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Reject settings no node can work with.
    pub fn check(&self) -> NodeResult<()> {
        if self.filename_attribute.trim().is_empty() {
            return Err(NodeError::Config("filename_attribute is empty".into()));
        }
        if self.archive_extension.contains('/') {
            return Err(NodeError::Config(format!(
                "archive_extension {:?} contains a path separator",
                self.archive_extension
            )));
        }
        Ok(())
    }

    /// The key deriver described by this configuration.
    pub fn key_deriver(&self) -> KeyDeriver {
        KeyDeriver::new(self.archive_extension.as_str(), self.default_filename.as_str())
    }

    /// The compressor described by this configuration.
    pub fn compressor(&self) -> Compressor {
        Compressor::new(self.compression_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = NodeConfig::default();
        assert_eq!(c.archive_extension, "zip");
        assert_eq!(c.default_filename, "file.txt");
        assert_eq!(c.compression_level, 6);
        assert!(c.validate_on_write);
        assert_eq!(c.filename_attribute, "filename");
        assert_eq!(c.key_deriver(), KeyDeriver::ZIP);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = NodeConfig::from_toml_str("compression_level = 9\n").unwrap();
        assert_eq!(c.compression_level, 9);
        assert_eq!(c.archive_extension, "zip");
        assert!(c.validate_on_write);
    }

    #[test]
    fn full_toml() {
        let c = NodeConfig::from_toml_str(
            r#"
            archive_extension = "pkz"
            default_filename = "blob.bin"
            compression_level = 1
            validate_on_write = false
            filename_attribute = "stored_as"
            "#,
        )
        .unwrap();
        assert_eq!(c.key_deriver().derive(None).storage_key, "blob.pkz");
        assert_eq!(c.compressor().level(), 1);
        assert!(!c.validate_on_write);
        assert_eq!(c.filename_attribute, "stored_as");
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = NodeConfig::from_toml_str("compression_level = \"high\"").unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn blank_attribute_rejected() {
        let err = NodeConfig::from_toml_str("filename_attribute = \"\"").unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn compression_level_is_clamped() {
        let c = NodeConfig {
            compression_level: 30,
            ..Default::default()
        };
        assert_eq!(c.compressor().level(), 9);
    }
}
