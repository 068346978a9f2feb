use anchor_client::solana_sdk::{
    instruction::InstructionError, pubkey::Pubkey, transaction::TransactionError,
};
use regex::Regex;
use solana_client::client_error::ClientError;
use thiserror::Error;

use crate::{constants::*, mint::poll::PollError, mint::session::MintPhase};

#[derive(Debug, Error)]
pub enum MintError {
    #[error("A mint is already in flight (phase: {0:?})")]
    AlreadyInFlight(MintPhase),

    #[error("Invalid mint phase transition from {from:?} to {to:?}")]
    InvalidTransition { from: MintPhase, to: MintPhase },

    #[error("Candy machine pays into {on_chain}, but the configured treasury is {configured}")]
    TreasuryMismatch { on_chain: Pubkey, configured: Pubkey },

    #[error("Candy machine belongs to config {on_chain}, but the configured config is {configured}")]
    ConfigMismatch { on_chain: Pubkey, configured: Pubkey },

    #[error("Failed to build mint instructions: {0}")]
    Instruction(String),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error(transparent)]
    Rpc(#[from] anyhow::Error),
}

impl MintError {
    pub fn kind(&self) -> MintErrorKind {
        match self {
            MintError::Rpc(err) => MintErrorKind::from_error(err),
            _ => MintErrorKind::Unknown,
        }
    }
}

/// Candy machine program errors a minter can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintErrorKind {
    InsufficientFunds,
    SoldOut,
    NotLiveYet,
    Program(u32),
    Unknown,
}

impl MintErrorKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            NOT_ENOUGH_SOL_ERROR => MintErrorKind::InsufficientFunds,
            CANDY_MACHINE_EMPTY_ERROR => MintErrorKind::SoldOut,
            CANDY_MACHINE_NOT_LIVE_ERROR => MintErrorKind::NotLiveYet,
            code => MintErrorKind::Program(code),
        }
    }

    pub fn from_transaction_error(err: &TransactionError) -> Self {
        match err {
            TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
                Self::from_code(*code)
            }
            _ => MintErrorKind::Unknown,
        }
    }

    /// Structured client errors first, then whatever the message carries.
    pub fn from_error(err: &anyhow::Error) -> Self {
        if let Some(tx_err) = err
            .downcast_ref::<ClientError>()
            .and_then(|client_err| client_err.get_transaction_error())
        {
            let kind = Self::from_transaction_error(&tx_err);
            if kind != MintErrorKind::Unknown {
                return kind;
            }
        }

        Self::from_message(&format!("{:#}", err))
    }

    pub fn from_message(message: &str) -> Self {
        let hex = Regex::new(r"custom program error: 0x([0-9A-Fa-f]+)")
            .expect("Failed to compile program error regex.");
        if let Some(code) = hex
            .captures(message)
            .and_then(|captures| u32::from_str_radix(&captures[1], 16).ok())
        {
            return Self::from_code(code);
        }

        let number = Regex::new(r"Error Number: (\d+)")
            .expect("Failed to compile program error regex.");
        if let Some(code) = number
            .captures(message)
            .and_then(|captures| captures[1].parse::<u32>().ok())
        {
            return Self::from_code(code);
        }

        MintErrorKind::Unknown
    }

    /// Message shown when the transaction could not be submitted.
    pub fn message(&self) -> &'static str {
        match self {
            MintErrorKind::InsufficientFunds => {
                "Insufficient funds to mint. Please fund your wallet."
            }
            MintErrorKind::SoldOut => "SOLD OUT!",
            MintErrorKind::NotLiveYet => "Minting period hasn't started yet.",
            MintErrorKind::Program(_) | MintErrorKind::Unknown => {
                "Minting failed! Please try again!"
            }
        }
    }

    /// Message shown when the transaction landed but failed.
    pub fn rejected_message(&self) -> &'static str {
        match self {
            MintErrorKind::Program(_) | MintErrorKind::Unknown => "Mint failed! Please try again!",
            kind => kind.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_codes_map_to_kinds() {
        assert_eq!(MintErrorKind::from_code(309), MintErrorKind::InsufficientFunds);
        assert_eq!(MintErrorKind::from_code(311), MintErrorKind::SoldOut);
        assert_eq!(MintErrorKind::from_code(312), MintErrorKind::NotLiveYet);
        assert_eq!(MintErrorKind::from_code(310), MintErrorKind::Program(310));
    }

    #[test]
    fn hex_code_at_start_of_message_is_not_lost() {
        assert_eq!(
            MintErrorKind::from_message("custom program error: 0x138"),
            MintErrorKind::NotLiveYet
        );
        assert_eq!(
            MintErrorKind::from_message(
                "Transaction simulation failed: Error processing Instruction 4: custom program error: 0x137"
            ),
            MintErrorKind::SoldOut
        );
        assert_eq!(
            MintErrorKind::from_message("custom program error: 0x135"),
            MintErrorKind::InsufficientFunds
        );
    }

    #[test]
    fn anchor_error_number_is_parsed() {
        assert_eq!(
            MintErrorKind::from_message("Error Code: CandyMachineEmpty. Error Number: 311."),
            MintErrorKind::SoldOut
        );
    }

    #[test]
    fn unrelated_messages_are_unknown() {
        assert_eq!(
            MintErrorKind::from_message("connection refused"),
            MintErrorKind::Unknown
        );
        assert_eq!(
            MintErrorKind::Unknown.message(),
            "Minting failed! Please try again!"
        );
    }

    #[test]
    fn transaction_errors_map_custom_codes() {
        let err = TransactionError::InstructionError(4, InstructionError::Custom(0x137));
        assert_eq!(
            MintErrorKind::from_transaction_error(&err),
            MintErrorKind::SoldOut
        );
        assert_eq!(
            MintErrorKind::from_transaction_error(&TransactionError::AccountNotFound),
            MintErrorKind::Unknown
        );
    }

    #[test]
    fn rejected_messages() {
        assert_eq!(MintErrorKind::SoldOut.rejected_message(), "SOLD OUT!");
        assert_eq!(
            MintErrorKind::Program(7).rejected_message(),
            "Mint failed! Please try again!"
        );
    }

    #[test]
    fn rpc_errors_keep_their_kind() {
        let err = MintError::Rpc(anyhow::anyhow!(
            "RPC response error -32002: custom program error: 0x137"
        ));
        assert_eq!(err.kind(), MintErrorKind::SoldOut);
        assert_eq!(
            MintError::AlreadyInFlight(MintPhase::Polling).kind(),
            MintErrorKind::Unknown
        );
    }
}
