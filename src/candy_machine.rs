use anchor_client::solana_sdk::{hash::hash, pubkey::Pubkey};
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info};

use crate::{pdas::find_ata_for_mint, rpc::ChainRpc};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CandyMachineError {
    #[error("Candy machine account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("Account {account} is owned by {owner}, expected the candy machine program {program}")]
    WrongOwner {
        account: Pubkey,
        owner: Pubkey,
        program: Pubkey,
    },

    #[error("Account {0} is not a candy machine")]
    InvalidDiscriminator(Pubkey),

    #[error("Failed to deserialize candy machine {0}: {1}")]
    Deserialize(Pubkey, String),

    #[error("Candy machine {id} redeemed {redeemed} items out of {available}")]
    InconsistentSupply {
        id: Pubkey,
        available: u64,
        redeemed: u64,
    },
}

/// On-chain layout of a v1 candy machine account, after the discriminator.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CandyMachineAccount {
    pub authority: Pubkey,
    pub wallet: Pubkey,
    pub token_mint: Option<Pubkey>,
    pub config: Pubkey,
    pub data: CandyMachineData,
    pub items_redeemed: u64,
    pub bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CandyMachineData {
    pub uuid: String,
    pub price: u64,
    pub items_available: u64,
    pub go_live_date: Option<i64>,
}

pub fn account_discriminator() -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(b"account:CandyMachine").to_bytes()[..8]);
    discriminator
}

impl CandyMachineAccount {
    pub fn decode(id: &Pubkey, data: &[u8]) -> Result<Self, CandyMachineError> {
        if data.len() < 8 || data[..8] != account_discriminator() {
            return Err(CandyMachineError::InvalidDiscriminator(*id));
        }

        let mut payload = &data[8..];
        CandyMachineAccount::deserialize(&mut payload)
            .map_err(|err| CandyMachineError::Deserialize(*id, err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentTokenBalance {
    pub account: Pubkey,
    pub exists: bool,
    pub amount: u64,
}

/// Snapshot of a candy machine, rebuilt on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandyMachineState {
    pub program_id: Pubkey,
    pub id: Pubkey,
    pub authority: Pubkey,
    pub wallet: Pubkey,
    pub token_mint: Option<Pubkey>,
    pub config: Pubkey,
    pub price: u64,
    pub items_available: u64,
    pub items_redeemed: u64,
    pub items_remaining: u64,
    pub go_live_date: Option<i64>,
    pub payment_token: Option<PaymentTokenBalance>,
}

impl CandyMachineState {
    pub fn from_account(
        program_id: Pubkey,
        id: Pubkey,
        account: CandyMachineAccount,
        payment_token: Option<PaymentTokenBalance>,
    ) -> Result<Self, CandyMachineError> {
        let items_available = account.data.items_available;
        let items_redeemed = account.items_redeemed;
        let items_remaining = items_available.checked_sub(items_redeemed).ok_or(
            CandyMachineError::InconsistentSupply {
                id,
                available: items_available,
                redeemed: items_redeemed,
            },
        )?;

        Ok(CandyMachineState {
            program_id,
            id,
            authority: account.authority,
            wallet: account.wallet,
            token_mint: account.token_mint,
            config: account.config,
            price: account.data.price,
            items_available,
            items_redeemed,
            items_remaining,
            go_live_date: account.data.go_live_date,
            payment_token,
        })
    }

    pub fn is_sold_out(&self) -> bool {
        self.items_remaining == 0
    }

    /// On-chain go-live date, or `fallback` when the machine has none.
    pub fn go_live(&self, fallback: Option<i64>) -> Option<i64> {
        self.go_live_date.or(fallback)
    }

    pub fn is_live(&self, now: i64, fallback: Option<i64>) -> bool {
        self.go_live(fallback).map_or(true, |go_live| now >= go_live)
    }
}

/// Fetches and decodes the candy machine, plus the payer's payment-token
/// balance when `payment_mint` is set.
pub fn get_candy_machine_state<R: ChainRpc + ?Sized>(
    rpc: &R,
    program_id: &Pubkey,
    candy_machine_id: &Pubkey,
    payer: &Pubkey,
    payment_mint: Option<&Pubkey>,
) -> Result<CandyMachineState> {
    let account = rpc
        .fetch_account(candy_machine_id)?
        .ok_or(CandyMachineError::AccountNotFound(*candy_machine_id))?;

    if account.owner != *program_id {
        return Err(CandyMachineError::WrongOwner {
            account: *candy_machine_id,
            owner: account.owner,
            program: *program_id,
        }
        .into());
    }

    let candy_machine = CandyMachineAccount::decode(candy_machine_id, &account.data)?;

    let payment_token = match payment_mint {
        Some(mint) => Some(get_payment_token_balance(rpc, payer, mint)?),
        None => None,
    };

    let state =
        CandyMachineState::from_account(*program_id, *candy_machine_id, candy_machine, payment_token)?;

    info!(
        "Candy machine {}: {} available, {} redeemed, {} remaining",
        state.id, state.items_available, state.items_redeemed, state.items_remaining
    );

    Ok(state)
}

pub fn get_payment_token_balance<R: ChainRpc + ?Sized>(
    rpc: &R,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<PaymentTokenBalance> {
    let account = find_ata_for_mint(owner, mint);
    let exists = rpc.fetch_account(&account)?.is_some();

    let amount = if exists {
        rpc.fetch_token_balance(&account)?
    } else {
        0
    };

    debug!(
        "Payment token account {} (exists: {}, amount: {})",
        account, exists, amount
    );

    Ok(PaymentTokenBalance {
        account,
        exists,
        amount,
    })
}
