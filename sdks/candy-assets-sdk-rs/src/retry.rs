//! Retry Controller

use std::{fmt::Display, future::Future};

use tracing::{info, warn};

use crate::{
    error::{FetchError, UpdateError},
    outcome::{RetryReason, UpdateOutcome},
    DEFAULT_MAX_ATTEMPTS,
};

/// Errors that may clear up if the whole attempt is repeated.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for UpdateError {
    fn is_transient(&self) -> bool {
        match self {
            // a malformed address never resolves
            UpdateError::Fetch(FetchError::InvalidMint(_)) => false,
            UpdateError::Fetch(_) | UpdateError::Parse(_) => true,
        }
    }
}

/// Hard ceiling on attempts per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Run `op` until it succeeds, fails terminally, or the budget is spent.
///
/// `op` receives the 1-based attempt number. Retryable outcomes sleep for
/// their reason's back-off, except after the final attempt. Transient errors
/// are retried immediately; any other error ends the loop as
/// [`UpdateOutcome::TerminalFailure`].
pub async fn with_retry<F, Fut, E>(policy: RetryPolicy, mut op: F) -> UpdateOutcome
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<UpdateOutcome, E>>,
    E: Transient + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_reason = RetryReason::NoResponse;

    for attempt in 1..=max_attempts {
        let reason = match op(attempt).await {
            Ok(UpdateOutcome::RetryableFailure(reason)) => reason,
            Ok(outcome) => return outcome,
            Err(e) if e.is_transient() => {
                warn!("attempt {attempt}/{max_attempts} failed: {e}");
                RetryReason::Transient(e.to_string())
            }
            Err(e) => return UpdateOutcome::TerminalFailure(e.to_string()),
        };

        let wait = reason.backoff();
        if attempt < max_attempts && !wait.is_zero() {
            info!("waiting {}s before attempt {}", wait.as_secs(), attempt + 1);
            tokio::time::sleep(wait).await;
        }
        last_reason = reason;
    }

    UpdateOutcome::ExhaustedRetries(format!(
        "Failed after {max_attempts} attempts: {last_reason}"
    ))
}
