//! Implementations of the deploy and exercise commands: the concrete plan
//! and interaction sequence for the Prism contract suite

use chain_common::{artifacts::Artifact, types::{Funds, Signer}};
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::{
    cli::{DeployArgs, ExerciseArgs},
    constants::{
        ALLOWANCE_AMOUNT, BASE_DENOM, DEPOSIT_AMOUNT, HOST_PORTION, LAUNCH_AMOUNT,
        MINT_AMOUNT, PRISM_FORGE_CODE_KEY, PRISM_FORGE_KEY, PRISM_INTEGRATION_CODE_KEY,
        PRISM_INTEGRATION_KEY, TOKEN_CODE_KEY, TOKEN_DECIMALS, TOKEN_KEY, TOKEN_NAME,
        TOKEN_SYMBOL,
    },
    errors::ScriptError,
    gateway::ChainGateway,
    orchestrator::run_plan,
    plan::{DeploymentPlan, DeploymentStep, ResolvedDeps},
    sequencer::{run_sequence, InteractionStep, Target},
    store::ArtifactStore,
    utils::launch_schedule,
};

/// Resolves a dependency's contract address from a resolved artifact map
fn dep_address(deps: &ResolvedDeps, name: &str) -> Result<String, ScriptError> {
    deps.get(name)
        .and_then(Artifact::address)
        .map(str::to_string)
        .ok_or_else(|| {
            ScriptError::UnresolvedDependency(format!("no address recorded for '{}'", name))
        })
}

/// Deploys the Prism contract suite, skipping steps whose artifacts are
/// already recorded for the network
pub(crate) async fn deploy(
    args: DeployArgs,
    gateway: &dyn ChainGateway,
    store: &ArtifactStore,
    network: &str,
    signer: &Signer,
) -> Result<(), ScriptError> {
    let plan = prism_plan(&args, signer);
    let outcomes = run_plan(gateway, store, network, signer, &plan).await?;

    for (name, outcome) in &outcomes {
        info!(step = %name, ?outcome, "plan step settled");
    }

    Ok(())
}

/// The deployment plan for the Prism suite: three uploads, three
/// instantiates, with the forge's init message fed by the token's address
fn prism_plan(args: &DeployArgs, signer: &Signer) -> DeploymentPlan {
    let owner = signer.address.clone();
    let minter = signer.address.clone();
    let operator = signer.address.clone();
    let receiver = args.receiver.clone();
    let host_portion_receiver = args.receiver.clone();

    DeploymentPlan::new(vec![
        DeploymentStep::upload(PRISM_INTEGRATION_CODE_KEY, &args.integration_wasm),
        DeploymentStep::upload(TOKEN_CODE_KEY, &args.token_wasm),
        DeploymentStep::upload(PRISM_FORGE_CODE_KEY, &args.forge_wasm),
        DeploymentStep::instantiate(
            PRISM_INTEGRATION_KEY,
            PRISM_INTEGRATION_CODE_KEY,
            &[],
            move |_| {
                Ok(json!({
                    "owner": owner,
                    "denom": BASE_DENOM,
                }))
            },
        ),
        DeploymentStep::instantiate(TOKEN_KEY, TOKEN_CODE_KEY, &[], move |_| {
            Ok(json!({
                "name": TOKEN_NAME,
                "symbol": TOKEN_SYMBOL,
                "decimals": TOKEN_DECIMALS,
                "initial_balances": [],
                "mint": { "minter": minter },
            }))
        }),
        DeploymentStep::instantiate(
            PRISM_FORGE_KEY,
            PRISM_FORGE_CODE_KEY,
            &[TOKEN_KEY],
            move |deps| {
                let token = dep_address(deps, TOKEN_KEY)?;
                Ok(json!({
                    "operator": operator,
                    "receiver": receiver,
                    "token": token,
                    "base_denom": BASE_DENOM,
                    "host_portion": HOST_PORTION,
                    "host_portion_receiver": host_portion_receiver,
                }))
            },
        ),
    ])
}

/// Runs the post-deployment exercise sequence against the deployed suite
pub(crate) async fn exercise(
    args: ExerciseArgs,
    gateway: &dyn ChainGateway,
    store: &ArtifactStore,
    network: &str,
    signer: &Signer,
) -> Result<(), ScriptError> {
    let steps = prism_sequence(&args, signer);
    run_sequence(gateway, store, network, signer, &steps).await
}

/// Picks the step target for a contract: an explicit override if one was
/// given, otherwise the store record under the contract's logical name
fn target_for(key: &str, override_address: &Option<String>) -> Target {
    match override_address {
        Some(addr) => Target::Address(addr.clone()),
        None => Target::Stored(key.to_string()),
    }
}

/// The fixed exercise sequence: wire the forge into the integration
/// contract, mint and approve tokens, open the launch, then deposit.
///
/// Order matters throughout; the allowance must exist before
/// `post_initialize` and the deposit that spend it.
fn prism_sequence(args: &ExerciseArgs, signer: &Signer) -> Vec<InteractionStep> {
    let sender = signer.address.clone();
    let forge_override = args.forge_address.clone();

    /// Resolves the forge address from an override or the artifact map
    fn forge_address(
        override_address: &Option<String>,
        artifacts: &ResolvedDeps,
    ) -> Result<String, ScriptError> {
        match override_address {
            Some(addr) => Ok(addr.clone()),
            None => dep_address(artifacts, PRISM_FORGE_KEY),
        }
    }

    let wire_forge = {
        let forge_override = forge_override.clone();
        move |artifacts: &ResolvedDeps| {
            let forge = forge_address(&forge_override, artifacts)?;
            Ok(json!({ "set_prism_address": { "address": forge } }))
        }
    };

    let allow_forge = {
        let forge_override = forge_override.clone();
        move |artifacts: &ResolvedDeps| {
            let forge = forge_address(&forge_override, artifacts)?;
            Ok(json!({
                "increase_allowance": { "spender": forge, "amount": ALLOWANCE_AMOUNT }
            }))
        }
    };

    let mint_recipient = sender.clone();
    let balance_holder = sender.clone();
    let depositor = sender.clone();

    vec![
        InteractionStep::execute(
            "set_prism_address",
            target_for(PRISM_INTEGRATION_KEY, &args.integration_address),
            wire_forge,
        ),
        InteractionStep::query(
            "get_prism_address",
            target_for(PRISM_INTEGRATION_KEY, &args.integration_address),
            |_| Ok(json!({ "get_prism_address": {} })),
        ),
        InteractionStep::query(
            "get_state_info",
            target_for(PRISM_INTEGRATION_KEY, &args.integration_address),
            |_| Ok(json!({ "get_state_info": {} })),
        ),
        InteractionStep::execute(
            "mint",
            target_for(TOKEN_KEY, &args.token_address),
            move |_| {
                Ok(json!({
                    "mint": { "recipient": mint_recipient, "amount": MINT_AMOUNT }
                }))
            },
        ),
        InteractionStep::query(
            "balance",
            target_for(TOKEN_KEY, &args.token_address),
            move |_| Ok(json!({ "balance": { "address": balance_holder } })),
        ),
        InteractionStep::execute(
            "increase_allowance",
            target_for(TOKEN_KEY, &args.token_address),
            allow_forge,
        ),
        InteractionStep::execute(
            "post_initialize",
            target_for(PRISM_FORGE_KEY, &args.forge_address),
            |_| {
                let schedule = launch_schedule(Utc::now());
                Ok(json!({
                    "post_initialize": {
                        "launch_config": {
                            "amount": LAUNCH_AMOUNT,
                            "phase1_start": schedule.phase1_start,
                            "phase2_start": schedule.phase2_start,
                            "phase2_end": schedule.phase2_end,
                            "phase2_slot_period": schedule.phase2_slot_period,
                        }
                    }
                }))
            },
        ),
        InteractionStep::execute_with_funds(
            "deposit",
            target_for(PRISM_INTEGRATION_KEY, &args.integration_address),
            Funds::from([(BASE_DENOM.to_string(), DEPOSIT_AMOUNT)]),
            |_| Ok(json!({ "deposit": {} })),
        ),
        InteractionStep::query(
            "deposit_info",
            target_for(PRISM_FORGE_KEY, &args.forge_address),
            move |_| Ok(json!({ "deposit_info": { "address": depositor } })),
        ),
    ]
}

/// Prints the artifacts recorded for the network as pretty JSON
pub(crate) fn show_artifacts(store: &ArtifactStore, network: &str) -> Result<(), ScriptError> {
    let artifacts = store.list(network)?;
    let rendered = serde_json::to_string_pretty(&artifacts)
        .map_err(|e| ScriptError::StoreCorrupt(e.to_string()))?;
    println!("{}", rendered);

    Ok(())
}
