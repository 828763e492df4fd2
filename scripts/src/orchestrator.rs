//! The deployment orchestrator: walks a plan in dependency order, skipping
//! steps whose artifacts are already recorded and persisting each new
//! artifact before moving on.
//!
//! This is what makes runs idempotent and resumable: re-running against an
//! unchanged plan and store performs zero gateway calls, and a run aborted
//! mid-way leaves earlier steps' artifacts in place to be skipped next time.

use chain_common::{
    artifacts::Artifact,
    types::Signer,
};
use tracing::info;

use crate::{
    errors::ScriptError,
    gateway::ChainGateway,
    plan::{DeploymentPlan, DeploymentStep, ResolvedDeps, StepKind},
    store::ArtifactStore,
    utils::read_wasm,
};

/// How a plan step was settled during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The store already held the step's artifact; no gateway call was made
    Skipped,
    /// The step ran against the gateway and its artifact was persisted
    Deployed,
}

/// Runs the given plan to completion against the gateway and store.
///
/// Returns the per-step outcomes in execution order. Any failure aborts the
/// run immediately; artifacts persisted by earlier steps remain valid.
pub async fn run_plan(
    gateway: &dyn ChainGateway,
    store: &ArtifactStore,
    network: &str,
    signer: &Signer,
    plan: &DeploymentPlan,
) -> Result<Vec<(String, StepOutcome)>, ScriptError> {
    let mut outcomes = Vec::new();

    for step in plan.topological_order()? {
        if let Some(existing) = store.get(network, &step.name)? {
            info!(step = %step.name, artifact = ?existing, "artifact already recorded, skipping");
            outcomes.push((step.name.clone(), StepOutcome::Skipped));
            continue;
        }

        let artifact = run_step(gateway, store, network, signer, step)
            .await
            .map_err(|e| ScriptError::StepFailed(step.name.clone(), Box::new(e)))?;

        // Persist before the next step so an abort here is resumable
        store.put(network, &step.name, artifact)?;
        outcomes.push((step.name.clone(), StepOutcome::Deployed));
    }

    Ok(outcomes)
}

/// Executes a single pending step, returning the artifact it produced
async fn run_step(
    gateway: &dyn ChainGateway,
    store: &ArtifactStore,
    network: &str,
    signer: &Signer,
    step: &DeploymentStep,
) -> Result<Artifact, ScriptError> {
    let resolved = resolve_dependencies(store, network, step)?;

    match &step.kind {
        StepKind::Upload { wasm_path } => {
            info!(step = %step.name, path = %wasm_path.display(), "uploading code");
            let wasm = read_wasm(wasm_path)?;
            let code_id = gateway.upload_code(signer, &wasm).await?;
            info!(step = %step.name, code_id, "code uploaded");

            Ok(Artifact::CodeId(code_id))
        }
        StepKind::Instantiate { code_id_from, init_msg } => {
            let code_id = resolved
                .get(code_id_from)
                .and_then(Artifact::code_id)
                .ok_or_else(|| {
                    ScriptError::UnresolvedDependency(format!(
                        "step '{}' needs a code id from '{}'",
                        step.name, code_id_from
                    ))
                })?;

            let msg = init_msg(&resolved)?;
            info!(step = %step.name, code_id, %msg, "instantiating contract");
            let tx = gateway.instantiate(signer, code_id, &msg).await?;

            let address = tx.contract_address().ok_or_else(|| {
                ScriptError::AddressNotFound(format!("tx {}", tx.tx_hash))
            })?;
            info!(step = %step.name, address, tx_hash = %tx.tx_hash, "contract instantiated");

            Ok(Artifact::Address(address.to_string()))
        }
    }
}

/// Resolves all of a step's dependencies from the artifact store.
///
/// With a topologically ordered plan every dependency has been persisted by
/// the time its dependents run, so an absent artifact means the store was
/// edited out from under us.
fn resolve_dependencies(
    store: &ArtifactStore,
    network: &str,
    step: &DeploymentStep,
) -> Result<ResolvedDeps, ScriptError> {
    let mut resolved = ResolvedDeps::new();
    for dep in &step.depends_on {
        let artifact = store.get(network, dep)?.ok_or_else(|| {
            ScriptError::UnresolvedDependency(format!(
                "step '{}' depends on '{}', which has no recorded artifact on '{}'",
                step.name, dep, network
            ))
        })?;
        resolved.insert(dep.clone(), artifact);
    }

    Ok(resolved)
}
