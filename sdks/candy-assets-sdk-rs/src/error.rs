//! Error types

use {std::path::PathBuf, thiserror::Error};

/// Failures while resolving a token's metadata document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Token id is not a base58 32-byte address
    #[error("invalid mint address: {0}")]
    InvalidMint(String),
    /// Transport or decoding failure talking to the RPC node
    #[error("chain lookup failed: {0}")]
    Rpc(#[source] Box<solana_client::client_error::ClientError>),
    /// RPC node answered with an error object
    #[error("chain lookup rejected: {0}")]
    RpcResponse(String),
    /// No metadata account exists for the mint
    #[error("metadata account not found for mint {0}")]
    AccountNotFound(String),
    /// Metadata account bytes did not decode
    #[error("invalid metadata account: {0}")]
    InvalidAccount(String),
    /// GET against the metadata uri failed
    #[error("request to {uri} failed: {source}")]
    Http {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
    /// Body at the metadata uri is not the expected JSON
    #[error("malformed metadata document at {uri}: {source}")]
    Document {
        uri: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The display name carries no usable `#<n>` segment.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Name has no `#`
    #[error("name {0:?} has no '#' segment")]
    MissingNumber(String),
    /// Segment after `#` is not a non-negative integer
    #[error("name {name:?} has non-numeric segment {segment:?}")]
    InvalidNumber { name: String, segment: String },
}

/// Error raised by one update attempt before the external tool classified it.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Configuration rejected at startup.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    /// A required field is empty
    #[error("{0} must not be empty")]
    Missing(&'static str),
    /// A field is present but unusable
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failures obtaining the minted-token list.
#[derive(Debug, Error)]
pub enum MintListError {
    /// Snapshot never succeeded and nothing is cached
    #[error("mint snapshot failed after {attempts} attempts and no cache exists at {}", .path.display())]
    Snapshot { attempts: u32, path: PathBuf },
    /// Cache file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Cache file is not a JSON array of addresses
    #[error("malformed mint list {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Cache file holds no tokens
    #[error("mint list {} is empty", .path.display())]
    Empty { path: PathBuf },
}

/// Batch-level failures.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Nothing to process; the run is aborted
    #[error("token list is empty")]
    EmptyTokenList,
    /// Results file could not be created; outcomes are still logged and returned
    #[error("failed to write report {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
