//! Token Metadata account layout

use borsh::{BorshDeserialize, BorshSerialize};

/// Account discriminator for `MetadataV1` accounts.
pub const METADATA_V1_KEY: u8 = 4;

/// Creator entry stored on chain
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct OnChainCreator {
    /// Creator wallet
    pub address: [u8; 32],
    /// Whether the creator signed the metadata
    pub verified: bool,
    /// Percentage of royalties
    pub share: u8,
}

/// Mutable data section of the metadata account
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct MetadataData {
    /// The name of the token, NUL padded on chain
    pub name: String,
    /// The symbol of the token, NUL padded on chain
    pub symbol: String,
    /// URI of the off-chain JSON document, NUL padded on chain
    pub uri: String,
    /// Royalty basis points
    pub seller_fee_basis_points: u16,
    /// Optional creator list
    pub creators: Option<Vec<OnChainCreator>>,
}

/// Leading fields of a metadata account.
///
/// Later versions append fields (editions, collection, uses, ...) that are
/// never read here, so decoding stops after `is_mutable`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct MetadataAccount {
    /// Account discriminator
    pub key: u8,
    /// Authority allowed to update the metadata
    pub update_authority: [u8; 32],
    /// The mint this metadata belongs to
    pub mint: [u8; 32],
    /// Name, symbol, uri and royalties
    pub data: MetadataData,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
}

impl MetadataAccount {
    /// Decode the account prefix, ignoring trailing bytes, and strip string padding.
    pub fn unpack(src: &[u8]) -> Result<Self, String> {
        let mut slice = src;
        let mut account =
            Self::deserialize(&mut slice).map_err(|e| format!("borsh decode: {e}"))?;
        if account.key != METADATA_V1_KEY {
            return Err(format!(
                "unexpected account key {} (expected {METADATA_V1_KEY})",
                account.key
            ));
        }
        account.data.name = trim_padding(&account.data.name);
        account.data.symbol = trim_padding(&account.data.symbol);
        account.data.uri = trim_padding(&account.data.uri);
        Ok(account)
    }

    pub fn uri(&self) -> &str {
        &self.data.uri
    }
}

fn trim_padding(s: &str) -> String {
    s.trim_end_matches('\0').to_string()
}
