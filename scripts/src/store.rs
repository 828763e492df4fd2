//! The artifact store: a durable record of code ids and contract addresses
//! keyed by network and logical contract name.
//!
//! Backed by a single JSON file (`deployments.json` by default) laid out as
//! `{network: {name: {"codeId": n} | {"address": s}}}`. Every operation is a
//! full read-modify-write of the file, preserving unrelated networks and
//! names. A missing file is an empty store; an unparseable one is
//! [`ScriptError::StoreCorrupt`].

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use chain_common::artifacts::Artifact;

use crate::errors::ScriptError;

/// The full contents of the deployments file
type StoreContents = BTreeMap<String, BTreeMap<String, Artifact>>;

/// A file-backed artifact store
pub struct ArtifactStore {
    /// Path of the backing deployments file
    path: PathBuf,
}

impl ArtifactStore {
    /// Creates a store over the given deployments file.
    ///
    /// The file need not exist yet; it is created on the first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Reads the full contents of the deployments file
    fn read(&self) -> Result<StoreContents, ScriptError> {
        if !self.path.exists() {
            return Ok(StoreContents::new());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| ScriptError::StoreCorrupt(e.to_string()))?;

        serde_json::from_str(&contents).map_err(|e| ScriptError::StoreCorrupt(e.to_string()))
    }

    /// Looks up the artifact recorded for the given network and logical name
    pub fn get(&self, network: &str, name: &str) -> Result<Option<Artifact>, ScriptError> {
        Ok(self
            .read()?
            .get(network)
            .and_then(|artifacts| artifacts.get(name))
            .cloned())
    }

    /// Records an artifact under the given network and logical name.
    ///
    /// A later write to the same key overwrites the earlier one; all other
    /// keys are preserved.
    pub fn put(&self, network: &str, name: &str, artifact: Artifact) -> Result<(), ScriptError> {
        let mut contents = self.read()?;
        contents
            .entry(network.to_string())
            .or_default()
            .insert(name.to_string(), artifact);

        let rendered = serde_json::to_string_pretty(&contents)
            .map_err(|e| ScriptError::StoreCorrupt(e.to_string()))?;

        fs::write(&self.path, rendered).map_err(|e| ScriptError::StoreCorrupt(e.to_string()))
    }

    /// Returns all artifacts recorded for the given network
    pub fn list(&self, network: &str) -> Result<BTreeMap<String, Artifact>, ScriptError> {
        Ok(self.read()?.get(network).cloned().unwrap_or_default())
    }
}
