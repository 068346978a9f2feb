use clap::{AppSettings, Parser, Subcommand};

use crate::constants::DEFAULT_CONFIG;

#[derive(Parser)]
#[clap(author, version, about)]
#[clap(setting(AppSettings::SubcommandRequiredElseHelp))]
pub struct Cli {
    /// Log level: trace, debug, info, warn, error, off
    #[clap(short, long, global = true)]
    pub log_level: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the candy machine, wallet balance and whether minting is open
    Show {
        /// Path to the keypair file, uses Sol config or defaults to "~/.config/solana/id.json"
        #[clap(short, long)]
        keypair: Option<String>,

        /// RPC Url or cluster name (devnet, testnet, mainnet, localnet)
        #[clap(short, long)]
        rpc_url: Option<String>,

        /// Path to the config file, defaults to "config.json"
        #[clap(short, long, default_value = DEFAULT_CONFIG)]
        config: String,
    },

    /// Mint NFTs from the candy machine
    Mint {
        /// Path to the keypair file, uses Sol config or defaults to "~/.config/solana/id.json"
        #[clap(short, long)]
        keypair: Option<String>,

        /// RPC Url or cluster name (devnet, testnet, mainnet, localnet)
        #[clap(short, long)]
        rpc_url: Option<String>,

        /// Path to the config file, defaults to "config.json"
        #[clap(short, long, default_value = DEFAULT_CONFIG)]
        config: String,

        /// Wait for the go-live date instead of exiting
        #[clap(long)]
        wait: bool,

        /// Amount of NFTs to be minted in sequence
        #[clap(short, long)]
        number: Option<u64>,
    },
}
