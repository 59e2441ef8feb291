//! Per-token update outcomes

use std::{fmt, time::Duration};

use crate::ordinal::Ordinal;

/// Why an attempt may succeed if repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    /// Updater could not start, timed out, or produced no result
    NoResponse,
    /// Updater reported `unable to confirm transaction`
    TransactionUnconfirmed,
    /// Updater reported `Node is behind`
    NodeBehind,
    /// Metadata fetch or ordinal parse failed before the updater ran
    Transient(String),
}

impl RetryReason {
    /// Wait before the next attempt.
    pub fn backoff(&self) -> Duration {
        match self {
            RetryReason::TransactionUnconfirmed => Duration::from_secs(3),
            RetryReason::NodeBehind => Duration::from_secs(15),
            RetryReason::NoResponse | RetryReason::Transient(_) => Duration::ZERO,
        }
    }
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryReason::NoResponse => f.write_str("no response"),
            RetryReason::TransactionUnconfirmed => f.write_str("transaction unconfirmed"),
            RetryReason::NodeBehind => f.write_str("node behind"),
            RetryReason::Transient(msg) => f.write_str(msg),
        }
    }
}

/// Result of updating one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Updater's stdout
    Success(String),
    RetryableFailure(RetryReason),
    /// Updater's stderr, or the error that stopped the attempt
    TerminalFailure(String),
    /// Summary of the last failure once the retry budget is spent
    ExhaustedRetries(String),
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Success(_))
    }

    /// One report line for `token`, naming the NFT when its ordinal is known.
    pub fn report_line(&self, token: &str, ordinal: Option<Ordinal>) -> String {
        let nft = ordinal
            .map(|o| format!(" for NFT #{}", o.display_number()))
            .unwrap_or_default();
        match self {
            UpdateOutcome::Success(_) => {
                format!("Successfully updated URI{nft} | Mint address: {token}")
            }
            UpdateOutcome::RetryableFailure(reason) => {
                format!("Failed to update URI{nft} | Mint address: {token} | Error: {reason}")
            }
            UpdateOutcome::TerminalFailure(err) => {
                format!("Failed to update URI{nft} | Mint address: {token} | Error: {err}")
            }
            UpdateOutcome::ExhaustedRetries(summary) => {
                format!("Failed to update URI{nft} | Mint address: {token} | Error: {summary}")
            }
        }
    }
}
