pub use anchor_client::solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
pub use anyhow::{anyhow, Result};
pub use tracing::{debug, error, info, warn};

pub use crate::constants::*;
pub use crate::errors::*;
pub use crate::setup::{mint_setup, MintContext};
