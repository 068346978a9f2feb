//! Presentation rules for the mint screen: which action is offered, how the
//! countdown reads, and which alert follows an attempt.

use anchor_client::solana_sdk::native_token::LAMPORTS_PER_SOL;
use chrono::NaiveDateTime;

use crate::{
    candy_machine::CandyMachineState,
    mint::{
        errors::{MintError, MintErrorKind},
        poll::PollError,
    },
    rpc::SignatureOutcome,
};

pub const MINT_LABEL: &str = "MINT";
pub const MINTING_LABEL: &str = "MINTING...";
pub const SOLD_OUT_LABEL: &str = "SOLD OUT";
pub const CLAIMED_ALL_MESSAGE: &str = "You have claimed all of your mints!";
pub const MINT_SUCCEEDED_MESSAGE: &str = "Congratulations! Mint succeeded!";
pub const MINTING_MESSAGE: &str = "Minting...";
pub const UNCONFIRMED_MESSAGE: &str = "Mint outcome unknown!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintAction {
    /// The payer's payment-token account is empty; no mint button is shown.
    ClaimedAll,
    SoldOut,
    /// Seconds until go-live.
    Countdown(i64),
    Minting,
    Ready,
}

impl MintAction {
    pub fn evaluate(
        state: &CandyMachineState,
        now: i64,
        fallback_go_live: Option<i64>,
        minting: bool,
    ) -> Self {
        if let Some(payment) = &state.payment_token {
            if payment.exists && payment.amount == 0 {
                return MintAction::ClaimedAll;
            }
        }

        if state.is_sold_out() {
            return MintAction::SoldOut;
        }

        if let Some(go_live) = state.go_live(fallback_go_live) {
            if now < go_live {
                return MintAction::Countdown(go_live - now);
            }
        }

        if minting {
            MintAction::Minting
        } else {
            MintAction::Ready
        }
    }

    /// Button label, `None` when no button is shown.
    pub fn label(&self) -> Option<String> {
        match self {
            MintAction::ClaimedAll => None,
            MintAction::SoldOut => Some(SOLD_OUT_LABEL.to_string()),
            MintAction::Countdown(seconds) => Some(format_countdown(*seconds)),
            MintAction::Minting => Some(MINTING_LABEL.to_string()),
            MintAction::Ready => Some(MINT_LABEL.to_string()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, MintAction::Ready)
    }
}

/// `"<H> hours, <M> minutes, <S> seconds"`, days folded into hours.
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    format!(
        "{} hours, {} minutes, {} seconds",
        hours + days * 24,
        minutes,
        secs
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    pub message: String,
    pub severity: Severity,
}

impl AlertState {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        AlertState {
            message: message.into(),
            severity,
        }
    }

    pub fn minting() -> Self {
        Self::new(MINTING_MESSAGE, Severity::Info)
    }

    /// Alert for a transaction that reached the cluster.
    pub fn from_status(status: &SignatureOutcome) -> Self {
        match &status.err {
            None => Self::new(MINT_SUCCEEDED_MESSAGE, Severity::Success),
            Some(err) => Self::new(
                MintErrorKind::from_transaction_error(err).rejected_message(),
                Severity::Error,
            ),
        }
    }

    /// Alert for an attempt that failed before a status was available.
    ///
    /// An unconfirmed transaction may still land; the alert carries its signature.
    pub fn from_error(err: &MintError) -> Self {
        if let MintError::Poll(
            PollError::Timeout { signature, .. }
            | PollError::AttemptsExhausted { signature, .. }
            | PollError::Cancelled { signature },
        ) = err
        {
            return Self::new(
                format!(
                    "{} Transaction {} may still land, check it before minting again.",
                    UNCONFIRMED_MESSAGE, signature
                ),
                Severity::Warning,
            );
        }

        let message = match err {
            MintError::AlreadyInFlight(_)
            | MintError::TreasuryMismatch { .. }
            | MintError::ConfigMismatch { .. } => err.to_string(),
            _ => err.kind().message().to_string(),
        };
        Self::new(message, Severity::Error)
    }
}

/// `abcd...wxyz`
pub fn shorten_address(address: &str, chars: usize) -> String {
    let count = address.chars().count();
    if count <= chars * 2 {
        return address.to_string();
    }

    let head: String = address.chars().take(chars).collect();
    let tail: String = address.chars().skip(count - chars).collect();
    format!("{}...{}", head, tail)
}

/// Go-live timestamp as a UTC date, `"invalid"` when out of range.
pub fn format_go_live(date: Option<i64>) -> String {
    match date {
        Some(date) => match NaiveDateTime::from_timestamp_opt(date, 0) {
            Some(date) => date.format("%a %B %e %Y %H:%M:%S UTC").to_string(),
            None => "invalid".to_string(),
        },
        None => "none".to_string(),
    }
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
