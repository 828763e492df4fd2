//! Definitions of deployment artifacts: the on-chain identifiers recorded
//! for each logical contract name in the deployments file

use serde::{Deserialize, Serialize};

/// An on-chain identifier produced by a deployment step.
///
/// Serializes with external tagging so the persisted record reads
/// `{"codeId": 62243}` or `{"address": "terra1..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Artifact {
    /// The code id assigned to an uploaded wasm blob
    CodeId(u64),
    /// The address of an instantiated contract
    Address(String),
}

impl Artifact {
    /// Returns the code id if this artifact is one
    pub fn code_id(&self) -> Option<u64> {
        match self {
            Artifact::CodeId(id) => Some(*id),
            Artifact::Address(_) => None,
        }
    }

    /// Returns the contract address if this artifact is one
    pub fn address(&self) -> Option<&str> {
        match self {
            Artifact::CodeId(_) => None,
            Artifact::Address(addr) => Some(addr.as_str()),
        }
    }
}
