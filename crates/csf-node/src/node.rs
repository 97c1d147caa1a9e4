use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use csf_archive::{single_entry, ArchiveEntry, Compressor};
use csf_attrs::AttributeStore;
use csf_store::{ObjectRepository, StoreError};
use csf_types::KeyDeriver;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::NodeConfig;
use crate::error::{NodeError, NodeResult};
use crate::source::FileSource;
use crate::validation::{SingleFileValidator, ValidationError};

/// What the node currently knows about its attached file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeState {
    /// No file attached.
    Unset,
    /// A file is attached under `storage_key`.
    ///
    /// `original_key` is the container's entry name. It is only known to
    /// the node that wrote the file; a reloaded node reads it back from
    /// the container on demand.
    Set {
        storage_key: String,
        original_key: Option<String>,
    },
}

/// A record holding exactly one compressed file.
pub struct CompressedFileNode {
    objects: Arc<dyn ObjectRepository>,
    attributes: Arc<dyn AttributeStore>,
    config: NodeConfig,
    deriver: KeyDeriver,
    compressor: Compressor,
    state: NodeState,
}

impl CompressedFileNode {
    /// Create a node over a record's stores, optionally attaching `source`.
    pub fn new(
        objects: Arc<dyn ObjectRepository>,
        attributes: Arc<dyn AttributeStore>,
        config: NodeConfig,
        source: Option<FileSource>,
    ) -> NodeResult<Self> {
        let mut node = Self::unset(objects, attributes, config)?;
        if let Some(source) = source {
            node.set_file(source)?;
        }
        Ok(node)
    }

    /// Reopen a node whose file was attached earlier.
    ///
    /// The state comes from the `filename` attribute alone; nothing is
    /// read from the repository.
    pub fn load(
        objects: Arc<dyn ObjectRepository>,
        attributes: Arc<dyn AttributeStore>,
        config: NodeConfig,
    ) -> NodeResult<Self> {
        let mut node = Self::unset(objects, attributes, config)?;
        let filename = node
            .attributes
            .try_get_string(&node.config.filename_attribute)?;
        if let Some(storage_key) = filename {
            debug!(storage_key = %storage_key, "node loaded");
            node.state = NodeState::Set {
                storage_key,
                original_key: None,
            };
        }
        Ok(node)
    }

    fn unset(
        objects: Arc<dyn ObjectRepository>,
        attributes: Arc<dyn AttributeStore>,
        config: NodeConfig,
    ) -> NodeResult<Self> {
        config.check()?;
        Ok(Self {
            objects,
            attributes,
            deriver: config.key_deriver(),
            compressor: config.compressor(),
            config,
            state: NodeState::Unset,
        })
    }

    // ---- Accessors ----

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn is_set(&self) -> bool {
        matches!(self.state, NodeState::Set { .. })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Storage key of the attached container.
    pub fn filename(&self) -> NodeResult<&str> {
        match &self.state {
            NodeState::Set { storage_key, .. } => Ok(storage_key.as_str()),
            NodeState::Unset => Err(NodeError::NotSet),
        }
    }

    /// Name of the file inside the container.
    pub fn original_filename(&self) -> NodeResult<String> {
        match &self.state {
            NodeState::Unset => Err(NodeError::NotSet),
            NodeState::Set {
                original_key: Some(original_key),
                ..
            } => Ok(original_key.clone()),
            NodeState::Set { storage_key, .. } => Ok(self.stored_entry(storage_key)?.name),
        }
    }

    /// Every key in the record's repository, sorted.
    pub fn object_names(&self) -> NodeResult<Vec<String>> {
        let mut keys = self.objects.list_keys()?;
        keys.sort();
        Ok(keys)
    }

    // ---- Writing ----

    /// Attach `source`, replacing whatever the record held before.
    ///
    /// The new container is written before any stale object is deleted,
    /// and the `filename` attribute is updated last. A failure before the
    /// write leaves the record untouched.
    pub fn set_file(&mut self, source: FileSource) -> NodeResult<()> {
        source.check()?;
        let keys = self.deriver.derive(source.name().as_deref());
        let data = source.read_all()?;
        let container = self.compressor.compress(&data, &keys.original_key)?;

        let existing = self.objects.list_keys()?;
        self.objects.put(&keys.storage_key, &container)?;
        debug!(
            storage_key = %keys.storage_key,
            size = data.len(),
            container_size = container.len(),
            "container stored"
        );

        for stale in existing.iter().filter(|k| **k != keys.storage_key) {
            match self.objects.delete(stale) {
                Ok(true) => debug!(key = %stale, "stale object deleted"),
                Ok(false) | Err(StoreError::NotFound(_)) => {
                    debug!(key = %stale, "stale object already gone")
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.attributes.set_attribute(
            &self.config.filename_attribute,
            Value::String(keys.storage_key.clone()),
        )?;

        info!(
            original_key = %keys.original_key,
            storage_key = %keys.storage_key,
            replaced = existing.len(),
            "file attached"
        );
        self.state = NodeState::Set {
            storage_key: keys.storage_key,
            original_key: Some(keys.original_key),
        };

        if self.config.validate_on_write {
            self.validate()?;
        }
        Ok(())
    }

    // ---- Reading ----

    /// Open a fresh, independent stream over the decompressed content.
    ///
    /// `key` defaults to the attached storage key. Any other key is read as
    /// a single-entry container.
    pub fn open(&self, key: Option<&str>) -> NodeResult<Cursor<Vec<u8>>> {
        let storage_key = match key {
            Some(key) => key,
            None => self.filename()?,
        };
        let container = self.objects.get(storage_key)?;
        let data = match &self.state {
            NodeState::Set {
                storage_key: current,
                original_key: Some(entry),
            } if current == storage_key => self.compressor.extract(&container, entry)?,
            _ => self.compressor.extract_any(&container)?.1,
        };
        Ok(Cursor::new(data))
    }

    /// The attached file's bytes.
    pub fn get_bytes(&self) -> NodeResult<Vec<u8>> {
        Ok(self.open(None)?.into_inner())
    }

    /// The attached file's content as UTF-8 text.
    pub fn get_content(&self) -> NodeResult<String> {
        Ok(String::from_utf8(self.get_bytes()?)?)
    }

    // ---- Validation ----

    /// Check that the repository holds exactly the object named by the
    /// `filename` attribute, and that this node agrees with it.
    pub fn validate(&self) -> NodeResult<()> {
        let filename = self
            .attributes
            .try_get_string(&self.config.filename_attribute)?;
        let objects = self.object_names()?;

        let result = SingleFileValidator::check(filename.as_deref(), &objects)
            .and_then(|()| self.check_state(filename.as_deref()));
        if let Err(e) = &result {
            warn!(error = %e, "record failed validation");
        }
        result.map_err(NodeError::from)
    }

    /// `validate`, then confirm the stored container holds exactly one
    /// entry with the expected name and intact content.
    pub fn verify(&self) -> NodeResult<()> {
        self.validate()?;
        let storage_key = self.filename()?;
        let container = self.objects.get(storage_key)?;
        let entries = self.compressor.list_entries(&container)?;
        let entry = single_entry(&entries)?;

        if let NodeState::Set {
            original_key: Some(expected),
            ..
        } = &self.state
        {
            if entry.name != *expected {
                return Err(ValidationError::EntryMismatch {
                    storage_key: storage_key.to_string(),
                    expected: expected.clone(),
                    found: entry.name.clone(),
                }
                .into());
            }
        }

        // Extraction checks size and CRC.
        self.compressor.extract(&container, &entry.name)?;
        debug!(storage_key, entry = %entry.name, "record verified");
        Ok(())
    }

    fn check_state(&self, attribute: Option<&str>) -> Result<(), ValidationError> {
        match (&self.state, attribute) {
            (NodeState::Set { storage_key, .. }, Some(attribute)) if storage_key != attribute => {
                Err(ValidationError::StaleNode {
                    node: storage_key.clone(),
                    attribute: attribute.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn stored_entry(&self, storage_key: &str) -> NodeResult<ArchiveEntry> {
        let container = self.objects.get(storage_key)?;
        let entries = self.compressor.list_entries(&container)?;
        Ok(single_entry(&entries)?.clone())
    }
}

impl fmt::Debug for CompressedFileNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressedFileNode")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
