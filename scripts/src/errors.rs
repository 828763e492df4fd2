//! Definitions of errors that can occur during the execution of the deploy
//! and exercise scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy and exercise
/// scripts
#[derive(Debug)]
pub enum ScriptError {
    /// The deployments file exists but could not be read or parsed
    StoreCorrupt(String),
    /// Error initializing the gateway client
    ClientInitialization(String),
    /// The chain rejected a code upload
    UploadFailed(String),
    /// The chain or contract rejected a state-changing transaction;
    /// carries the raw log verbatim
    ExecuteFailed(String),
    /// A read-only contract query failed
    QueryFailed(String),
    /// No `contract_address` attribute was found in an instantiation result
    AddressNotFound(String),
    /// A step's dependency could not be resolved from the artifact store,
    /// or the plan itself is malformed
    UnresolvedDependency(String),
    /// A named step failed, aborting the run
    StepFailed(String, Box<ScriptError>),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::StoreCorrupt(s) => write!(f, "deployments store is corrupt: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::UploadFailed(s) => write!(f, "error uploading code: {}", s),
            ScriptError::ExecuteFailed(s) => write!(f, "error executing contract: {}", s),
            ScriptError::QueryFailed(s) => write!(f, "error querying contract: {}", s),
            ScriptError::AddressNotFound(s) => {
                write!(f, "no contract address in transaction result: {}", s)
            }
            ScriptError::UnresolvedDependency(s) => {
                write!(f, "unresolved dependency: {}", s)
            }
            ScriptError::StepFailed(step, source) => {
                write!(f, "step '{}' failed: {}", step, source)
            }
        }
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScriptError::StepFailed(_, source) => Some(source.as_ref()),
            _ => None,
        }
    }
}
