//! Definitions of CLI arguments and commands for the deploy and exercise
//! scripts

use std::path::PathBuf;

use chain_common::types::Signer;
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, exercise, show_artifacts},
    constants::{
        DEFAULT_DEPLOYMENTS_PATH, DEFAULT_NETWORK, PRISM_FORGE_WASM, PRISM_INTEGRATION_WASM,
        TOKEN_WASM,
    },
    errors::ScriptError,
    gateway::ChainGateway,
    store::ArtifactStore,
};

/// Deploy and exercise the Prism smart contracts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "DEPLOYER_PRIV_KEY")]
    pub priv_key: String,

    /// Account address of the deployer
    #[arg(short, long)]
    pub sender: String,

    /// Network RPC URL
    #[arg(short, long)]
    pub rpc_url: String,

    /// Logical network name under which artifacts are recorded
    #[arg(short, long, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Path to the deployments file
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The script subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the contract suite, resuming from recorded artifacts
    Deploy(DeployArgs),
    /// Run the post-deployment exercise sequence
    Exercise(ExerciseArgs),
    /// Print the artifacts recorded for the network
    Artifacts,
}

impl Command {
    /// Runs the command against the given gateway and store
    pub async fn run(
        self,
        gateway: &dyn ChainGateway,
        store: &ArtifactStore,
        network: &str,
        signer: &Signer,
    ) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, gateway, store, network, signer).await,
            Command::Exercise(args) => exercise(args, gateway, store, network, signer).await,
            Command::Artifacts => show_artifacts(store, network),
        }
    }
}

/// Arguments to the deploy command
#[derive(Args)]
pub struct DeployArgs {
    /// Address receiving forge proceeds and the host portion
    #[arg(long)]
    pub receiver: String,

    /// Path to the prism integration wasm binary
    #[arg(long, default_value = PRISM_INTEGRATION_WASM)]
    pub integration_wasm: PathBuf,

    /// Path to the prism forge wasm binary
    #[arg(long, default_value = PRISM_FORGE_WASM)]
    pub forge_wasm: PathBuf,

    /// Path to the token wasm binary
    #[arg(long, default_value = TOKEN_WASM)]
    pub token_wasm: PathBuf,
}

/// Arguments to the exercise command.
///
/// The address overrides bypass the artifact store for a contract, e.g. to
/// exercise a suite deployed by other tooling.
#[derive(Args)]
pub struct ExerciseArgs {
    /// Explicit prism integration contract address
    #[arg(long)]
    pub integration_address: Option<String>,

    /// Explicit prism forge contract address
    #[arg(long)]
    pub forge_address: Option<String>,

    /// Explicit token contract address
    #[arg(long)]
    pub token_address: Option<String>,
}
