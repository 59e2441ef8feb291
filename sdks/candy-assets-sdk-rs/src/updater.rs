//! URI Updater Invoker

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    ordinal::Ordinal,
    outcome::{RetryReason, UpdateOutcome},
    process::{CommandRunner, ProcessOutput},
    TokenId,
};

/// stderr marker for a transaction the updater could not confirm.
pub const UNCONFIRMED_MARKER: &str = "unable to confirm transaction";

/// stderr marker for an RPC node lagging the cluster.
pub const NODE_BEHIND_MARKER: &str = "Node is behind";

/// Points one token's on-chain URI at `<base>/<ordinal>.json` via the external updater.
pub struct UriUpdater<R> {
    runner: R,
    base_json_url: String,
    timeout: Duration,
}

impl<R: CommandRunner> UriUpdater<R> {
    pub fn new(runner: R, base_json_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            runner,
            base_json_url: base_json_url.into(),
            timeout,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn target_uri(&self, ordinal: Ordinal) -> String {
        target_uri(&self.base_json_url, ordinal)
    }

    /// Argument list for `update uri`.
    pub fn update_args(&self, token: &TokenId, new_uri: &str) -> Vec<String> {
        vec![
            "update".into(),
            "uri".into(),
            "--account".into(),
            token.to_string(),
            "--new-uri".into(),
            new_uri.to_string(),
            "--timeout".into(),
            self.timeout.as_secs().to_string(),
        ]
    }

    /// Run the updater once and classify what it reported.
    pub async fn invoke(&self, token: &TokenId, ordinal: Ordinal) -> UpdateOutcome {
        let new_uri = self.target_uri(ordinal);
        let args = self.update_args(token, &new_uri);
        let output = self.runner.run(&args, self.timeout).await;
        let outcome = classify(output.as_ref());
        log_outcome(&outcome, token, ordinal);
        outcome
    }
}

/// `base` without its trailing slashes, then `/<ordinal>.json`.
pub fn target_uri(base: &str, ordinal: Ordinal) -> String {
    format!("{}/{}.json", base.trim_end_matches('/'), ordinal.index())
}

/// Map the updater's result onto an outcome.
///
/// Only stderr drives the decision: empty means success, two known markers
/// mean the attempt may be repeated, anything else is final.
pub fn classify(output: Option<&ProcessOutput>) -> UpdateOutcome {
    let Some(output) = output else {
        return UpdateOutcome::RetryableFailure(RetryReason::NoResponse);
    };
    if output.stderr.is_empty() {
        return UpdateOutcome::Success(output.stdout.clone());
    }
    if output.stderr.contains(UNCONFIRMED_MARKER) {
        UpdateOutcome::RetryableFailure(RetryReason::TransactionUnconfirmed)
    } else if output.stderr.contains(NODE_BEHIND_MARKER) {
        UpdateOutcome::RetryableFailure(RetryReason::NodeBehind)
    } else {
        UpdateOutcome::TerminalFailure(output.stderr.clone())
    }
}

fn log_outcome(outcome: &UpdateOutcome, token: &TokenId, ordinal: Ordinal) {
    let n = ordinal.display_number();
    match outcome {
        UpdateOutcome::Success(stdout) => {
            info!("Successfully updated URI for NFT #{n}");
            debug!("Response after updating URI: \"{stdout}\"");
        }
        UpdateOutcome::RetryableFailure(RetryReason::NoResponse) => {
            warn!("Failed to update URI for NFT: {token}, trying again... Error: Couldn't get response from updater");
        }
        UpdateOutcome::RetryableFailure(RetryReason::TransactionUnconfirmed) => {
            warn!("Transaction failed, retrying for NFT #{n} | Mint address: {token}...");
        }
        UpdateOutcome::RetryableFailure(RetryReason::NodeBehind) => {
            warn!("Node is behind, waiting 15s and retrying for NFT #{n} | Mint address: {token}...");
        }
        UpdateOutcome::RetryableFailure(RetryReason::Transient(msg)) => {
            warn!("Retrying NFT #{n} | Mint address: {token} | Error: {msg}");
        }
        UpdateOutcome::TerminalFailure(stderr) => {
            warn!("Error updating URI for NFT #{n} | Mint address: {token} | Error: {stderr}");
        }
        UpdateOutcome::ExhaustedRetries(summary) => {
            warn!("Giving up on NFT #{n} | Mint address: {token} | {summary}");
        }
    }
}
