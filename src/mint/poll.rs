use std::time::Duration;

use anchor_client::solana_sdk::signature::Signature;
use retry::delay::Exponential;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::{
    config::PollConfig,
    rpc::{ChainRpc, SignatureOutcome},
    utils::Interrupt,
};

#[derive(Debug, Error)]
pub enum PollError {
    #[error("Transaction {signature} was not confirmed within {elapsed:?} ({attempts} status checks)")]
    Timeout {
        signature: Signature,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("Transaction {signature} was not confirmed after {attempts} status checks")]
    AttemptsExhausted { signature: Signature, attempts: u32 },

    #[error("Confirmation of transaction {signature} was cancelled")]
    Cancelled { signature: Signature },

    #[error("Failed to fetch status of transaction {signature}: {source}")]
    Rpc {
        signature: Signature,
        source: anyhow::Error,
    },
}

/// Wait schedule between status checks: exponential, capped at `max_interval`.
pub fn poll_delays(config: &PollConfig) -> impl Iterator<Item = Duration> {
    let max_interval = config.max_interval;
    let base = config.interval.as_millis() as u64;

    Exponential::from_millis_with_factor(base, config.backoff_factor)
        .map(move |delay| delay.min(max_interval))
}

/// Polls the signature status until the cluster reports one.
///
/// Returns the first present status, whether it carries an error or not.
/// Gives up after `max_attempts` checks, when the next wait would cross
/// `timeout`, or as soon as `interrupt` fires.
pub async fn poll_signature_status<R: ChainRpc + ?Sized>(
    rpc: &R,
    signature: &Signature,
    config: &PollConfig,
    interrupt: &Interrupt,
) -> Result<SignatureOutcome, PollError> {
    let started = Instant::now();
    let mut delays = poll_delays(config);
    let mut attempts = 0u32;

    loop {
        if interrupt.is_triggered() {
            return Err(PollError::Cancelled {
                signature: *signature,
            });
        }

        attempts += 1;
        let status = rpc
            .signature_status(signature)
            .map_err(|source| PollError::Rpc {
                signature: *signature,
                source,
            })?;

        if let Some(status) = status {
            debug!(
                "Signature {} found after {} check(s): {:?}",
                signature, attempts, status
            );
            return Ok(status);
        }

        if attempts >= config.max_attempts {
            warn!("Giving up on {} after {} checks", signature, attempts);
            return Err(PollError::AttemptsExhausted {
                signature: *signature,
                attempts,
            });
        }

        let delay = delays.next().unwrap_or(config.max_interval);
        let elapsed = started.elapsed();

        if elapsed + delay > config.timeout {
            warn!("Timed out waiting for {} after {:?}", signature, elapsed);
            return Err(PollError::Timeout {
                signature: *signature,
                attempts,
                elapsed,
            });
        }

        debug!("Signature {} not found yet, waiting {:?}", signature, delay);

        tokio::select! {
            _ = sleep(delay) => {}
            _ = interrupt.triggered() => {
                return Err(PollError::Cancelled {
                    signature: *signature,
                });
            }
        }
    }
}
