use anchor_client::solana_sdk::pubkey::Pubkey;

use crate::constants::*;

pub fn find_metadata_pda(mint: &Pubkey) -> Pubkey {
    // Derive metadata account
    let metadata_seeds = &[
        METADATA_PREFIX.as_bytes(),
        TOKEN_METADATA_PROGRAM_ID.as_ref(),
        mint.as_ref(),
    ];
    let (pda, _bump) = Pubkey::find_program_address(metadata_seeds, &TOKEN_METADATA_PROGRAM_ID);

    pda
}

pub fn find_master_edition_pda(mint: &Pubkey) -> Pubkey {
    // Derive Master Edition account
    let master_edition_seeds = &[
        METADATA_PREFIX.as_bytes(),
        TOKEN_METADATA_PROGRAM_ID.as_ref(),
        mint.as_ref(),
        EDITION_PREFIX.as_bytes(),
    ];
    let (pda, _bump) =
        Pubkey::find_program_address(master_edition_seeds, &TOKEN_METADATA_PROGRAM_ID);

    pda
}

/// Associated token account of `owner` for `mint`.
pub fn find_ata_for_mint(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    let seeds: &[&[u8]] = &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()];
    let (pda, _bump) = Pubkey::find_program_address(seeds, &ASSOCIATED_TOKEN_PROGRAM_ID);

    pda
}
