//! Batch Orchestrator and results report

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Local};
use tracing::{debug, error, info};

use crate::{
    config::RevealConfig,
    error::{BatchError, ConfigError, UpdateError},
    metadata::MetadataSource,
    ordinal::{extract_ordinal, Ordinal},
    outcome::UpdateOutcome,
    process::CommandRunner,
    retry::{with_retry, RetryPolicy},
    updater::UriUpdater,
    TokenId,
};

/// Final outcome for one token, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// 1-based position in the token list
    pub index: usize,
    pub token: TokenId,
    /// Last ordinal read from the token's metadata, if any attempt got that far
    pub ordinal: Option<Ordinal>,
    pub outcome: UpdateOutcome,
}

impl ReportEntry {
    pub fn line(&self) -> String {
        self.outcome.report_line(self.token.as_str(), self.ordinal)
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub entries: Vec<ReportEntry>,
    pub success: usize,
    pub fail: usize,
    /// Where the report was persisted; `None` when the write failed
    pub path: Option<PathBuf>,
}

impl BatchReport {
    /// File contents: one outcome line per token.
    pub fn render(&self) -> String {
        render_lines(&self.entries)
    }
}

fn render_lines(entries: &[ReportEntry]) -> String {
    entries.iter().map(|e| e.line() + "\n").collect()
}

/// `<batch_id>_results_<mmddyyHHMMSS>.log`, or `..._<mmddyyHHMMSS>-<n>.log`
/// for the `n`th run started within the same second.
pub fn report_file_name(batch_id: &str, at: DateTime<Local>, n: u32) -> String {
    let stamp = at.format("%m%d%y%H%M%S");
    match n {
        0 => format!("{batch_id}_results_{stamp}.log"),
        n => format!("{batch_id}_results_{stamp}-{n}.log"),
    }
}

/// Walks the minted-token list one token at a time.
pub struct BatchOrchestrator<M, R> {
    config: RevealConfig,
    metadata: M,
    updater: UriUpdater<R>,
    policy: RetryPolicy,
}

impl<M: MetadataSource, R: CommandRunner> BatchOrchestrator<M, R> {
    /// Validates `config` before anything runs.
    pub fn new(config: RevealConfig, metadata: M, runner: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let updater = UriUpdater::new(runner, config.base_json_url.clone(), config.update_timeout);
        let policy = RetryPolicy {
            max_attempts: config.max_attempts,
        };
        Ok(Self {
            config,
            metadata,
            updater,
            policy,
        })
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn updater(&self) -> &UriUpdater<R> {
        &self.updater
    }

    /// Update every token in order, log the results and persist the report.
    ///
    /// A failing token never stops the batch and an unwritable report only
    /// leaves `path` empty; the only error is an empty token list.
    pub async fn run(&self, tokens: &[TokenId]) -> Result<BatchReport, BatchError> {
        if tokens.is_empty() {
            error!("Token list is empty, nothing to update");
            return Err(BatchError::EmptyTokenList);
        }

        let mut entries = Vec::with_capacity(tokens.len());
        let (mut success, mut fail) = (0, 0);

        for (i, token) in tokens.iter().enumerate() {
            let (outcome, ordinal) = self.process_token(token).await;
            if outcome.is_success() {
                success += 1;
            } else {
                fail += 1;
            }
            entries.push(ReportEntry {
                index: i + 1,
                token: token.clone(),
                ordinal,
                outcome,
            });
        }

        info!("~~~~~~~~~~~~~~~~~~~~ RESULTS ~~~~~~~~~~~~~~~~~~~~");
        for entry in &entries {
            info!("#{}: {}", entry.index, entry.line());
        }
        info!("Success: {success} | Fail: {fail}");

        let path = match write_report(&self.config.work_dir, &self.config.batch_id, &entries).await
        {
            Ok(path) => {
                info!("Report written to {}", path.display());
                Some(path)
            }
            Err(e) => {
                error!("{e}");
                None
            }
        };

        Ok(BatchReport {
            entries,
            success,
            fail,
            path,
        })
    }

    /// All attempts for one token; metadata is re-fetched on every attempt.
    pub async fn update_token(&self, token: &TokenId) -> UpdateOutcome {
        self.process_token(token).await.0
    }

    async fn process_token(&self, token: &TokenId) -> (UpdateOutcome, Option<Ordinal>) {
        let seen = Mutex::new(None);
        let outcome = with_retry(self.policy, |attempt| self.attempt(token, attempt, &seen)).await;
        let ordinal = seen.into_inner().unwrap_or_else(PoisonError::into_inner);
        (outcome, ordinal)
    }

    async fn attempt(
        &self,
        token: &TokenId,
        attempt: u32,
        seen: &Mutex<Option<Ordinal>>,
    ) -> Result<UpdateOutcome, UpdateError> {
        debug!(
            "Fetching metadata for {token} (attempt {attempt}/{})",
            self.policy.max_attempts
        );
        let doc = self.metadata.fetch(token).await?;
        let ordinal = extract_ordinal(&doc)?;
        *seen.lock().unwrap_or_else(PoisonError::into_inner) = Some(ordinal);
        info!(
            "Updating URI for NFT #{} | Mint address: {token}",
            ordinal.display_number()
        );
        Ok(self.updater.invoke(token, ordinal).await)
    }
}

/// Reserve a fresh report file in `dir` and write `entries` into it.
///
/// Names are claimed with `create_new`, so a report from an earlier run is
/// never overwritten.
async fn write_report(
    dir: &Path,
    batch_id: &str,
    entries: &[ReportEntry],
) -> Result<PathBuf, BatchError> {
    let report_err = |path: &Path, source: std::io::Error| BatchError::Report {
        path: path.to_path_buf(),
        source,
    };
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| report_err(dir, e))?;

    let at = Local::now();
    let mut n = 0;
    let path = loop {
        let candidate = dir.join(report_file_name(batch_id, at, n));
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(_) => break candidate,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(report_err(&candidate, e)),
        }
    };

    tokio::fs::write(&path, render_lines(entries))
        .await
        .map_err(|e| report_err(&path, e))?;
    Ok(path)
}
