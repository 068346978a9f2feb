use std::{str::FromStr, time::Duration};

use anchor_client::solana_sdk::pubkey::Pubkey;
use serde::{Deserialize, Serialize};

use crate::config::errors::*;
use crate::constants::*;

#[derive(Debug, Deserialize, Serialize)]
pub struct SolanaConfig {
    pub json_rpc_url: String,
    pub keypair_path: String,
    #[serde(default)]
    pub commitment: String,
}

/// Raw contents of `config.json`, before any address is parsed.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigData {
    /// Cluster name (devnet, testnet, mainnet, localnet) or RPC url.
    pub cluster: Option<String>,

    pub candy_machine_id: String,

    pub candy_machine_config: String,

    pub treasury: String,

    pub payment_token_mint: Option<String>,

    /// Fallback go-live date, used when the candy machine has none.
    pub start_date: Option<String>,

    pub candy_machine_program: Option<String>,

    #[serde(default)]
    pub poll: PollSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollSettings {
    pub interval_ms: Option<u64>,
    pub backoff_factor: Option<f64>,
    pub max_interval_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    pub interval: Duration,
    pub backoff_factor: f64,
    pub max_interval: Duration,
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: DEFAULT_POLL_INTERVAL,
            backoff_factor: DEFAULT_POLL_BACKOFF,
            max_interval: DEFAULT_POLL_MAX_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
            max_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }
}

impl PollConfig {
    /// Fixed interval, no backoff.
    pub fn fixed(interval: Duration, timeout: Duration, max_attempts: u32) -> Self {
        PollConfig {
            interval,
            backoff_factor: 1.0,
            max_interval: interval,
            timeout,
            max_attempts,
        }
    }
}

impl TryFrom<PollSettings> for PollConfig {
    type Error = ConfigError;

    fn try_from(settings: PollSettings) -> Result<Self, Self::Error> {
        let defaults = PollConfig::default();

        let interval = settings
            .interval_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.interval);
        let backoff_factor = settings.backoff_factor.unwrap_or(defaults.backoff_factor);
        let max_interval = settings
            .max_interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| defaults.max_interval.max(interval));
        let timeout = settings
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let max_attempts = settings.max_attempts.unwrap_or(defaults.max_attempts);

        if interval.is_zero() {
            return Err(ConfigError::InvalidPollSettings(
                "intervalMs must be greater than zero".to_string(),
            ));
        }
        if !backoff_factor.is_finite() || backoff_factor < 1.0 {
            return Err(ConfigError::InvalidPollSettings(format!(
                "backoffFactor must be at least 1.0, found {}",
                backoff_factor
            )));
        }
        if max_interval < interval {
            return Err(ConfigError::InvalidPollSettings(
                "maxIntervalMs must not be lower than intervalMs".to_string(),
            ));
        }
        if max_attempts == 0 {
            return Err(ConfigError::InvalidPollSettings(
                "maxAttempts must be greater than zero".to_string(),
            ));
        }

        Ok(PollConfig {
            interval,
            backoff_factor,
            max_interval,
            timeout,
            max_attempts,
        })
    }
}

/// Validated minting configuration. Every address has been parsed.
#[derive(Debug, Clone)]
pub struct MintConfig {
    pub cluster: Option<String>,
    pub program_id: Pubkey,
    pub candy_machine_id: Pubkey,
    pub config: Pubkey,
    pub treasury: Pubkey,
    pub payment_token_mint: Option<Pubkey>,
    pub start_date: Option<i64>,
    pub poll: PollConfig,
}

impl TryFrom<ConfigData> for MintConfig {
    type Error = ConfigError;

    fn try_from(data: ConfigData) -> Result<Self, Self::Error> {
        let program_id = parse_address(
            "candyMachineProgram",
            data.candy_machine_program.as_deref().unwrap_or(CANDY_MACHINE_V1),
        )?;
        let candy_machine_id = parse_address("candyMachineId", &data.candy_machine_id)?;
        let config = parse_address("candyMachineConfig", &data.candy_machine_config)?;
        let treasury = parse_address("treasury", &data.treasury)?;
        let payment_token_mint = data
            .payment_token_mint
            .as_deref()
            .filter(|mint| !mint.is_empty())
            .map(|mint| parse_address("paymentTokenMint", mint))
            .transpose()?;
        let start_date = start_date_as_timestamp(&data.start_date)?;

        Ok(MintConfig {
            cluster: data.cluster,
            program_id,
            candy_machine_id,
            config,
            treasury,
            payment_token_mint,
            start_date,
            poll: PollConfig::try_from(data.poll)?,
        })
    }
}

pub fn parse_address(field: &'static str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value.trim()).map_err(|_| ConfigError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}

pub fn start_date_as_timestamp(start_date: &Option<String>) -> Result<Option<i64>, ConfigError> {
    if let Some(start_date) = start_date {
        let timestamp = if let Ok(date) = chrono::DateTime::parse_from_rfc2822(start_date) {
            date.timestamp()
        } else if let Ok(date) = chrono::DateTime::parse_from_rfc3339(start_date) {
            date.timestamp()
        } else if let Ok(timestamp) = start_date.parse::<i64>() {
            timestamp
        } else {
            return Err(ConfigError::InvalidStartDate(start_date.to_string()));
        };
        Ok(Some(timestamp))
    } else {
        Ok(None)
    }
}
