//! Program derived address helpers for the Token Metadata program

use solana_sdk::{pubkey, pubkey::Pubkey};

use crate::error::FetchError;

/// Token Metadata program id
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// PDA seed for metadata accounts
pub const METADATA_SEED: &[u8] = b"metadata";

/// Parse a base58 mint address.
pub fn parse_mint(mint: &str) -> Result<Pubkey, FetchError> {
    mint.parse()
        .map_err(|_| FetchError::InvalidMint(mint.to_string()))
}

/// Find the metadata PDA (and bump) for a given mint.
pub fn find_metadata_pda(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
}

/// Derive the metadata PDA for a base58 mint address.
pub fn metadata_pda(mint: &str) -> Result<Pubkey, FetchError> {
    let mint = parse_mint(mint)?;
    Ok(find_metadata_pda(&mint).0)
}
