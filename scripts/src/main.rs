//! Entry point for the deploy and exercise scripts

use chain_common::types::Signer;
use clap::Parser;
use scripts::{cli::Cli, errors::ScriptError, gateway::HttpGateway, store::ArtifactStore};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        sender,
        rpc_url,
        network,
        deployments_path,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let gateway = HttpGateway::new(&rpc_url)?;
    let signer = Signer { address: sender, key: priv_key };
    let store = ArtifactStore::new(&deployments_path);

    command.run(&gateway, &store, &network, &signer).await
}
