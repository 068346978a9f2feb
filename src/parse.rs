use std::{env, fs::File, path::PathBuf};

use regex::Regex;

use crate::{config::data::SolanaConfig, mint::errors::MintErrorKind};

fn home_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        let drive = env::var_os("HOMEDRIVE")?;
        let path = env::var_os("HOMEPATH")?;
        Some(PathBuf::from(drive).join(path))
    } else {
        env::var_os("HOME").map(PathBuf::from)
    }
}

/// Reads `~/.config/solana/cli/config.yml`, `None` when absent or unreadable.
pub fn parse_solana_config() -> Option<SolanaConfig> {
    let config_path = home_dir()?
        .join(".config")
        .join("solana")
        .join("cli")
        .join("config.yml");

    let conf_file = File::open(config_path).ok()?;
    serde_yaml::from_reader(&conf_file).ok()
}

/// Replaces raw program errors with the message a minter can act on.
pub fn parse_mint_errors(msg: &str) -> String {
    match MintErrorKind::from_message(msg) {
        MintErrorKind::Program(_) | MintErrorKind::Unknown => {
            let whitespace = Regex::new(r"\s+").expect("Failed to compile whitespace regex.");
            whitespace.replace_all(msg.trim(), " ").to_string()
        }
        kind => kind.message().to_string(),
    }
}
