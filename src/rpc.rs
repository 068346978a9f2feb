use anchor_client::solana_sdk::{
    account::Account, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::{Transaction, TransactionError},
};
use anyhow::{anyhow, Result};
use solana_client::rpc_client::RpcClient;
use solana_transaction_status::{TransactionConfirmationStatus, TransactionStatus};

/// Status of a submitted transaction once the cluster has seen it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureOutcome {
    pub slot: u64,
    pub err: Option<TransactionError>,
    pub confirmation_status: Option<TransactionConfirmationStatus>,
}

impl SignatureOutcome {
    pub fn is_success(&self) -> bool {
        self.err.is_none()
    }
}

impl From<TransactionStatus> for SignatureOutcome {
    fn from(status: TransactionStatus) -> Self {
        SignatureOutcome {
            slot: status.slot,
            err: status.err,
            confirmation_status: status.confirmation_status,
        }
    }
}

/// The RPC calls the minting client depends on.
pub trait ChainRpc {
    /// `None` when the account does not exist.
    fn fetch_account(&self, pubkey: &Pubkey) -> Result<Option<Account>>;

    /// Raw token amount held by an spl-token account.
    fn fetch_token_balance(&self, token_account: &Pubkey) -> Result<u64>;

    /// Lamports held by `pubkey`.
    fn fetch_balance(&self, pubkey: &Pubkey) -> Result<u64>;

    fn rent_exemption(&self, data_len: usize) -> Result<u64>;

    fn latest_blockhash(&self) -> Result<Hash>;

    fn submit_transaction(&self, transaction: &Transaction) -> Result<Signature>;

    /// `None` while the cluster has no record of the signature.
    fn signature_status(&self, signature: &Signature) -> Result<Option<SignatureOutcome>>;
}

impl ChainRpc for RpcClient {
    fn fetch_account(&self, pubkey: &Pubkey) -> Result<Option<Account>> {
        Ok(self
            .get_account_with_commitment(pubkey, self.commitment())?
            .value)
    }

    fn fetch_token_balance(&self, token_account: &Pubkey) -> Result<u64> {
        let balance = self.get_token_account_balance(token_account)?;
        balance.amount.parse::<u64>().map_err(|_| {
            anyhow!(
                "Invalid token amount '{}' for account {}",
                balance.amount,
                token_account
            )
        })
    }

    fn fetch_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        Ok(self.get_balance(pubkey)?)
    }

    fn rent_exemption(&self, data_len: usize) -> Result<u64> {
        Ok(self.get_minimum_balance_for_rent_exemption(data_len)?)
    }

    fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.get_latest_blockhash()?)
    }

    fn submit_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        Ok(self.send_transaction(transaction)?)
    }

    fn signature_status(&self, signature: &Signature) -> Result<Option<SignatureOutcome>> {
        let statuses = self.get_signature_statuses(&[*signature])?.value;
        Ok(statuses
            .into_iter()
            .next()
            .flatten()
            .map(SignatureOutcome::from))
    }
}
