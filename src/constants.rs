use std::time::Duration;

use console::Emoji;

pub use mpl_token_metadata::ID as TOKEN_METADATA_PROGRAM_ID;
pub use spl_associated_token_account::ID as ASSOCIATED_TOKEN_PROGRAM_ID;
pub use spl_token::ID as TOKEN_PROGRAM_ID;

/// Candy Machine v1 program.
pub const CANDY_MACHINE_V1: &str = "cndyAnrLdpjq1Ssp1z8xxDsB8dxe7u4HL5Nxi2K5WXZ";

pub const DEFAULT_CONFIG: &str = "config.json";
pub const DEFAULT_KEYPAIR: &str = "~/.config/solana/id.json";
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const LOG_FILE: &str = "candy-mint.log";

/// Size of an spl-token mint account.
pub const MINT_LAYOUT: u64 = 82;

pub const METADATA_PREFIX: &str = "metadata";
pub const EDITION_PREFIX: &str = "edition";

// program error codes observed for the v1 candy machine
pub const NOT_ENOUGH_SOL_ERROR: u32 = 0x135;
pub const CANDY_MACHINE_EMPTY_ERROR: u32 = 0x137;
pub const CANDY_MACHINE_NOT_LIVE_ERROR: u32 = 0x138;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_POLL_MAX_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_POLL_BACKOFF: f64 = 1.5;
pub const DEFAULT_POLL_ATTEMPTS: u32 = 60;

pub const CANDY_EMOJI: Emoji<'_, '_> = Emoji("🍬 ", "");
pub const COMPLETE_EMOJI: Emoji<'_, '_> = Emoji("✅ ", "");
pub const COMPUTER_EMOJI: Emoji<'_, '_> = Emoji("🖥  ", "");
pub const ERROR_EMOJI: Emoji<'_, '_> = Emoji("🛑 ", "");
pub const LOOKING_GLASS_EMOJI: Emoji<'_, '_> = Emoji("🔍 ", "");
pub const PAPER_EMOJI: Emoji<'_, '_> = Emoji("📝 ", "");
pub const WARNING_EMOJI: Emoji<'_, '_> = Emoji("⚠️  ", "");
pub const HOURGLASS_EMOJI: Emoji<'_, '_> = Emoji("⏳ ", "");
