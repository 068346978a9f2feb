use anchor_client::solana_sdk::{
    hash::hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction, system_program, sysvar,
};
use anchor_lang::ToAccountMetas;
use spl_token::instruction::{initialize_mint, mint_to};

use crate::{constants::*, mint::errors::MintError, pdas::*};

/// Everything needed to mint one NFT, apart from the fresh mint keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub program_id: Pubkey,
    pub candy_machine: Pubkey,
    pub config: Pubkey,
    pub payer: Pubkey,
    pub treasury: Pubkey,
    pub payment_mint: Option<Pubkey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintVariant {
    Free,
    PaymentToken { payment_account: Pubkey },
}

impl MintRequest {
    pub fn variant(&self) -> MintVariant {
        match self.payment_mint {
            Some(mint) => MintVariant::PaymentToken {
                payment_account: find_ata_for_mint(&self.payer, &mint),
            },
            None => MintVariant::Free,
        }
    }
}

/// Accounts of the candy machine `mint_nft` instruction, in program order.
#[derive(Debug, Clone, Copy)]
pub struct MintNftAccounts {
    pub config: Pubkey,
    pub candy_machine: Pubkey,
    pub payer: Pubkey,
    pub wallet: Pubkey,
    pub metadata: Pubkey,
    pub mint: Pubkey,
    pub mint_authority: Pubkey,
    pub update_authority: Pubkey,
    pub master_edition: Pubkey,
    pub token_metadata_program: Pubkey,
    pub token_program: Pubkey,
    pub system_program: Pubkey,
    pub rent: Pubkey,
    pub clock: Pubkey,
}

impl ToAccountMetas for MintNftAccounts {
    fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(self.config, false),
            AccountMeta::new(self.candy_machine, false),
            AccountMeta::new(self.payer, true),
            AccountMeta::new(self.wallet, false),
            AccountMeta::new(self.metadata, false),
            AccountMeta::new(self.mint, false),
            AccountMeta::new_readonly(self.mint_authority, true),
            AccountMeta::new_readonly(self.update_authority, true),
            AccountMeta::new(self.master_edition, false),
            AccountMeta::new_readonly(self.token_metadata_program, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.system_program, false),
            AccountMeta::new_readonly(self.rent, false),
            AccountMeta::new_readonly(self.clock, false),
        ]
    }
}

/// Anchor instruction discriminator: `sha256("global:<name>")[..8]`.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(format!("global:{}", name).as_bytes()).to_bytes()[..8]);
    discriminator
}

pub fn mint_nft_instruction(
    program_id: &Pubkey,
    accounts: &MintNftAccounts,
    remaining_accounts: Vec<AccountMeta>,
) -> Instruction {
    let mut metas = accounts.to_account_metas(None);
    metas.extend(remaining_accounts);

    Instruction {
        program_id: *program_id,
        accounts: metas,
        data: instruction_discriminator("mint_nft").to_vec(),
    }
}

/// Creates the associated token account with the legacy layout the v1
/// program was deployed against: empty data, rent sysvar last.
pub fn create_associated_token_account_instruction(
    associated_account: &Pubkey,
    payer: &Pubkey,
    wallet: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*associated_account, false),
            AccountMeta::new_readonly(*wallet, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ],
        data: vec![],
    }
}

/// Builds the ordered instruction list for one mint:
/// create mint account, initialize mint, create ATA, mint to ATA, `mint_nft`.
pub fn build_mint_instructions(
    request: &MintRequest,
    nft_mint: &Pubkey,
    mint_rent: u64,
) -> Result<Vec<Instruction>, MintError> {
    let payer = request.payer;

    // Create mint account
    let create_mint_account_ix = system_instruction::create_account(
        &payer,
        nft_mint,
        mint_rent,
        MINT_LAYOUT,
        &TOKEN_PROGRAM_ID,
    );

    // Initalize mint ix
    let init_mint_ix = initialize_mint(&TOKEN_PROGRAM_ID, nft_mint, &payer, Some(&payer), 0)
        .map_err(|err| MintError::Instruction(err.to_string()))?;

    // Derive associated token account
    let token_account = find_ata_for_mint(&payer, nft_mint);

    let create_assoc_account_ix =
        create_associated_token_account_instruction(&token_account, &payer, &payer, nft_mint);

    // Mint to instruction
    let mut mint_to_ix = mint_to(&TOKEN_PROGRAM_ID, nft_mint, &token_account, &payer, &[], 1)
        .map_err(|err| MintError::Instruction(err.to_string()))?;

    let mut remaining_accounts = Vec::new();

    if let MintVariant::PaymentToken { payment_account } = request.variant() {
        let payment_accounts = [
            AccountMeta::new(payment_account, false),
            AccountMeta::new_readonly(payer, false),
        ];
        mint_to_ix.accounts.extend_from_slice(&payment_accounts);
        remaining_accounts.extend_from_slice(&payment_accounts);
    }

    let accounts = MintNftAccounts {
        config: request.config,
        candy_machine: request.candy_machine,
        payer,
        wallet: request.treasury,
        metadata: find_metadata_pda(nft_mint),
        mint: *nft_mint,
        mint_authority: payer,
        update_authority: payer,
        master_edition: find_master_edition_pda(nft_mint),
        token_metadata_program: TOKEN_METADATA_PROGRAM_ID,
        token_program: TOKEN_PROGRAM_ID,
        system_program: system_program::ID,
        rent: sysvar::rent::ID,
        clock: sysvar::clock::ID,
    };

    let mint_nft_ix = mint_nft_instruction(&request.program_id, &accounts, remaining_accounts);

    Ok(vec![
        create_mint_account_ix,
        init_mint_ix,
        create_assoc_account_ix,
        mint_to_ix,
        mint_nft_ix,
    ])
}

#[cfg(test)]
mod tests {
    use sha2::{Digest, Sha256};
    use std::str::FromStr;

    use super::*;

    fn request(payment_mint: Option<Pubkey>) -> MintRequest {
        MintRequest {
            program_id: Pubkey::from_str(CANDY_MACHINE_V1).unwrap(),
            candy_machine: Pubkey::new_unique(),
            config: Pubkey::new_unique(),
            payer: Pubkey::new_unique(),
            treasury: Pubkey::new_unique(),
            payment_mint,
        }
    }

    fn flags(ix: &Instruction) -> Vec<(Pubkey, bool, bool)> {
        ix.accounts
            .iter()
            .map(|meta| (meta.pubkey, meta.is_signer, meta.is_writable))
            .collect()
    }

    #[test]
    fn discriminator_is_anchor_sighash() {
        let digest = Sha256::digest(b"global:mint_nft");
        assert_eq!(instruction_discriminator("mint_nft"), digest[..8]);
    }

    #[test]
    fn free_mint_instruction_order() {
        let request = request(None);
        let nft_mint = Pubkey::new_unique();
        let ixs = build_mint_instructions(&request, &nft_mint, 1_461_600).unwrap();

        let programs: Vec<Pubkey> = ixs.iter().map(|ix| ix.program_id).collect();
        assert_eq!(
            programs,
            vec![
                system_program::ID,
                TOKEN_PROGRAM_ID,
                ASSOCIATED_TOKEN_PROGRAM_ID,
                TOKEN_PROGRAM_ID,
                request.program_id,
            ]
        );
        assert_eq!(request.variant(), MintVariant::Free);
    }

    #[test]
    fn create_and_initialize_mint_accounts() {
        let request = request(None);
        let nft_mint = Pubkey::new_unique();
        let ixs = build_mint_instructions(&request, &nft_mint, 1_461_600).unwrap();

        assert_eq!(
            flags(&ixs[0]),
            vec![(request.payer, true, true), (nft_mint, true, true)]
        );
        assert_eq!(
            flags(&ixs[1]),
            vec![(nft_mint, false, true), (sysvar::rent::ID, false, false)]
        );
    }

    #[test]
    fn associated_account_uses_legacy_layout() {
        let request = request(None);
        let nft_mint = Pubkey::new_unique();
        let ixs = build_mint_instructions(&request, &nft_mint, 1_461_600).unwrap();
        let token_account = find_ata_for_mint(&request.payer, &nft_mint);

        assert!(ixs[2].data.is_empty());
        assert_eq!(
            flags(&ixs[2]),
            vec![
                (request.payer, true, true),
                (token_account, false, true),
                (request.payer, false, false),
                (nft_mint, false, false),
                (system_program::ID, false, false),
                (TOKEN_PROGRAM_ID, false, false),
                (sysvar::rent::ID, false, false),
            ]
        );
    }

    #[test]
    fn free_mint_to_and_mint_nft_accounts() {
        let request = request(None);
        let nft_mint = Pubkey::new_unique();
        let ixs = build_mint_instructions(&request, &nft_mint, 1_461_600).unwrap();
        let token_account = find_ata_for_mint(&request.payer, &nft_mint);

        let mut amount = vec![7u8];
        amount.extend(1u64.to_le_bytes());
        assert_eq!(ixs[3].data, amount);
        assert_eq!(
            flags(&ixs[3]),
            vec![
                (nft_mint, false, true),
                (token_account, false, true),
                (request.payer, true, false),
            ]
        );

        assert_eq!(ixs[4].data, instruction_discriminator("mint_nft").to_vec());
        assert_eq!(
            flags(&ixs[4]),
            vec![
                (request.config, false, false),
                (request.candy_machine, false, true),
                (request.payer, true, true),
                (request.treasury, false, true),
                (find_metadata_pda(&nft_mint), false, true),
                (nft_mint, false, true),
                (request.payer, true, false),
                (request.payer, true, false),
                (find_master_edition_pda(&nft_mint), false, true),
                (TOKEN_METADATA_PROGRAM_ID, false, false),
                (TOKEN_PROGRAM_ID, false, false),
                (system_program::ID, false, false),
                (sysvar::rent::ID, false, false),
                (sysvar::clock::ID, false, false),
            ]
        );
    }

    #[test]
    fn payment_token_variant_appends_payment_accounts() {
        let payment_mint = Pubkey::new_unique();
        let request = request(Some(payment_mint));
        let nft_mint = Pubkey::new_unique();
        let ixs = build_mint_instructions(&request, &nft_mint, 1_461_600).unwrap();
        let payment_account = find_ata_for_mint(&request.payer, &payment_mint);

        assert_eq!(ixs.len(), 5);
        assert_eq!(
            request.variant(),
            MintVariant::PaymentToken { payment_account }
        );

        let mint_to_flags = flags(&ixs[3]);
        assert_eq!(mint_to_flags.len(), 5);
        assert_eq!(
            mint_to_flags[3..],
            [(payment_account, false, true), (request.payer, false, false)]
        );

        let mint_nft_flags = flags(&ixs[4]);
        assert_eq!(mint_nft_flags.len(), 16);
        assert_eq!(
            mint_nft_flags[14..],
            [(payment_account, false, true), (request.payer, false, false)]
        );
    }

    #[test]
    fn rent_funds_the_mint_account() {
        let request = request(None);
        let nft_mint = Pubkey::new_unique();
        let ixs = build_mint_instructions(&request, &nft_mint, 1_461_600).unwrap();

        let expected = system_instruction::create_account(
            &request.payer,
            &nft_mint,
            1_461_600,
            MINT_LAYOUT,
            &TOKEN_PROGRAM_ID,
        );
        assert_eq!(ixs[0], expected);
    }
}
