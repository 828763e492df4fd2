//! The interaction sequencer: runs a fixed, ordered list of execute and
//! query steps against already-deployed contracts.
//!
//! Steps run strictly one after another; later steps frequently spend state
//! mutated by earlier ones (an allowance must exist before the deposit that
//! draws on it), so there is no reordering and no parallelism. A failing
//! step is terminal, and re-running the whole sequence is not guaranteed
//! safe: minting and depositing change on-chain state.

use chain_common::{
    artifacts::Artifact,
    types::{Funds, Signer},
};
use tracing::info;

use crate::{
    errors::ScriptError,
    gateway::ChainGateway,
    plan::{MessageBuilder, ResolvedDeps},
    store::ArtifactStore,
};

/// The contract an interaction step runs against
pub enum Target {
    /// A contract resolved by logical name from the artifact store
    Stored(String),
    /// An explicitly supplied contract address, bypassing the store
    Address(String),
}

/// What an interaction step does when it runs
pub enum Operation {
    /// A state-changing execute, with funds to attach (empty for none)
    Execute {
        /// Funds attached to the call
        funds: Funds,
    },
    /// A read-only query
    Query,
}

/// A single step of an interaction sequence
pub struct InteractionStep {
    /// The step's name, used in logs and failure reports
    pub name: String,
    /// The contract the step runs against
    pub target: Target,
    /// Whether the step executes or queries
    pub operation: Operation,
    /// Builds the step's message from the network's recorded artifacts
    pub message: MessageBuilder,
}

impl InteractionStep {
    /// Creates an execute step with no funds attached
    pub fn execute(
        name: &str,
        target: Target,
        message: impl Fn(&ResolvedDeps) -> Result<serde_json::Value, ScriptError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self::execute_with_funds(name, target, Funds::new(), message)
    }

    /// Creates an execute step attaching the given funds
    pub fn execute_with_funds(
        name: &str,
        target: Target,
        funds: Funds,
        message: impl Fn(&ResolvedDeps) -> Result<serde_json::Value, ScriptError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            target,
            operation: Operation::Execute { funds },
            message: Box::new(message),
        }
    }

    /// Creates a query step
    pub fn query(
        name: &str,
        target: Target,
        message: impl Fn(&ResolvedDeps) -> Result<serde_json::Value, ScriptError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            target,
            operation: Operation::Query,
            message: Box::new(message),
        }
    }
}

/// Runs the given steps strictly in order, stopping at the first failure.
///
/// The failing step's name is carried in the returned
/// [`ScriptError::StepFailed`]; steps after the failure point are never
/// invoked.
pub async fn run_sequence(
    gateway: &dyn ChainGateway,
    store: &ArtifactStore,
    network: &str,
    signer: &Signer,
    steps: &[InteractionStep],
) -> Result<(), ScriptError> {
    let artifacts = store.list(network)?;

    for step in steps {
        run_interaction(gateway, signer, &artifacts, step)
            .await
            .map_err(|e| ScriptError::StepFailed(step.name.clone(), Box::new(e)))?;
    }

    Ok(())
}

/// Executes or queries a single interaction step
async fn run_interaction(
    gateway: &dyn ChainGateway,
    signer: &Signer,
    artifacts: &ResolvedDeps,
    step: &InteractionStep,
) -> Result<(), ScriptError> {
    let contract = match &step.target {
        Target::Address(addr) => addr.clone(),
        Target::Stored(name) => artifacts
            .get(name)
            .and_then(Artifact::address)
            .ok_or_else(|| {
                ScriptError::UnresolvedDependency(format!(
                    "no address recorded for contract '{}'",
                    name
                ))
            })?
            .to_string(),
    };

    let msg = (step.message)(artifacts)?;

    match &step.operation {
        Operation::Execute { funds } => {
            info!(step = %step.name, %contract, %msg, "executing");
            let tx = gateway.execute(signer, &contract, &msg, funds).await?;
            info!(step = %step.name, tx_hash = %tx.tx_hash, "executed");
        }
        Operation::Query => {
            info!(step = %step.name, %contract, %msg, "querying");
            let response = gateway.query(&contract, &msg).await?;
            info!(step = %step.name, %response, "query response");
        }
    }

    Ok(())
}
