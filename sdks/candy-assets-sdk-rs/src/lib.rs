#![cfg_attr(not(test), forbid(unsafe_code))]

//! Candy Assets – Rust SDK
//!
//! This crate provides:
//! - JSON metadata templating for a numbered collection
//! - Renaming of prefixed media files into the `<n>.<ext>` scheme
//! - The batch reveal workflow: fetch each minted token's metadata, derive its
//!   ordinal, point its on-chain URI at the revealed JSON through an external
//!   updater tool, retry transient failures, and persist a results report
//!
//! The on-chain write itself is left to the external updater binary.

pub mod batch;
pub mod chain;
pub mod config;
pub mod error;
pub mod metadata;
pub mod minted;
pub mod ordinal;
pub mod outcome;
pub mod pda;
pub mod process;
pub mod rename;
pub mod retry;
pub mod state;
pub mod templating;
pub mod updater;

use std::{fmt, time::Duration};

pub use batch::{BatchOrchestrator, BatchReport, ReportEntry};
pub use chain::{ChainMetadataClient, SolanaRpcClient};
pub use config::{CollectionConfig, RevealConfig};
pub use error::{BatchError, ConfigError, FetchError, MintListError, ParseError, UpdateError};
pub use metadata::{MetadataDocument, MetadataFetcher, MetadataSource};
pub use minted::MintListSource;
pub use ordinal::{extract_ordinal, Ordinal};
pub use outcome::{RetryReason, UpdateOutcome};
pub use process::{CommandRunner, ProcessOutput, ProcessRunner};
pub use rename::{rename_media_files, RenameReport};
pub use retry::{with_retry, RetryPolicy, Transient};
pub use templating::{create_json_assets, AssetDocument, TemplatingReport};
pub use updater::UriUpdater;

/// Attempts per token before the batch gives up on it.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Wall-clock limit for one external updater invocation.
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_secs(240);

/// Default external tool used for on-chain writes and mint snapshots.
pub const DEFAULT_UPDATER_PROGRAM: &str = "metaboss";

/// Default JSON-RPC endpoint for metadata lookups.
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Identifier of one minted NFT account (base58 mint address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TokenId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
