use std::str::FromStr;

use anchor_client::{
    solana_sdk::{
        commitment_config::CommitmentConfig,
        signature::{read_keypair_file, Keypair},
    },
    Cluster,
};
use anyhow::Result;
use solana_client::rpc_client::RpcClient;
use tracing::{debug, info};

use crate::{config::MintConfig, constants::*, errors::SetupError, parse::parse_solana_config};

/// Connection and wallet a command works with.
pub struct MintContext {
    pub rpc: RpcClient,
    pub keypair: Keypair,
    pub rpc_url: String,
}

/// Resolves a cluster name (`devnet`, `mainnet`, ...) or URL to an RPC url.
pub fn cluster_url(cluster: &str) -> Result<String, SetupError> {
    Cluster::from_str(cluster)
        .map(|cluster| cluster.url().to_string())
        .map_err(|_| SetupError::InvalidCluster(cluster.to_string()))
}

/// RPC url: `--rpc-url`, then the configured cluster, then the Solana CLI
/// config, then devnet. Keypair: `--keypair`, then the Solana CLI config,
/// then `~/.config/solana/id.json`.
pub fn mint_setup(
    keypair_opt: Option<String>,
    rpc_url_opt: Option<String>,
    config: &MintConfig,
) -> Result<MintContext> {
    let sol_config_option = parse_solana_config();

    let rpc_url = match rpc_url_opt {
        Some(rpc_url) => cluster_url(&rpc_url)?,
        None => match (&config.cluster, &sol_config_option) {
            (Some(cluster), _) => cluster_url(cluster)?,
            (None, Some(sol_config)) => sol_config.json_rpc_url.clone(),
            (None, None) => DEFAULT_RPC_URL.to_string(),
        },
    };

    let keypair_path = match keypair_opt {
        Some(keypair_path) => keypair_path,
        None => match sol_config_option {
            Some(ref sol_config) => sol_config.keypair_path.clone(),
            None => DEFAULT_KEYPAIR.to_string(),
        },
    };
    let keypair_path = shellexpand::tilde(&keypair_path).to_string();

    let keypair = read_keypair_file(&keypair_path)
        .map_err(|err| SetupError::KeypairFileError(keypair_path.clone(), err.to_string()))?;

    let commitment = sol_config_option
        .as_ref()
        .and_then(|sol_config| CommitmentConfig::from_str(&sol_config.commitment).ok())
        .unwrap_or_else(CommitmentConfig::confirmed);

    debug!("Using keypair {} with commitment {:?}", keypair_path, commitment);
    info!("Connecting to {}", rpc_url);

    Ok(MintContext {
        rpc: RpcClient::new_with_commitment(rpc_url.clone(), commitment),
        keypair,
        rpc_url,
    })
}
