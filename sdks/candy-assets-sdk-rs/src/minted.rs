//! Minted-Token Source: cached snapshot of a candy machine's mint accounts.

use std::{path::PathBuf, time::Duration};

use tracing::{debug, error, info, warn};

use crate::{error::MintListError, process::CommandRunner, TokenId, DEFAULT_UPDATE_TIMEOUT};

/// Snapshot attempts before falling back to whatever is cached.
pub const SNAPSHOT_ATTEMPTS: u32 = 3;

/// Reads the mint list from `<work_dir>/<batch_id>_mint_accounts.json`,
/// regenerating it with the external tool's `snapshot mints` command on request.
pub struct MintListSource<R> {
    runner: R,
    batch_id: String,
    work_dir: PathBuf,
    timeout: Duration,
}

impl<R: CommandRunner> MintListSource<R> {
    pub fn new(runner: R, batch_id: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            batch_id: batch_id.into(),
            work_dir: work_dir.into(),
            timeout: DEFAULT_UPDATE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache_path(&self) -> PathBuf {
        self.work_dir
            .join(format!("{}_mint_accounts.json", self.batch_id))
    }

    pub fn snapshot_args(&self) -> Vec<String> {
        vec![
            "snapshot".into(),
            "mints".into(),
            "-c".into(),
            self.batch_id.clone(),
            "--v2".into(),
            "--timeout".into(),
            self.timeout.as_secs().to_string(),
            "--output".into(),
            self.work_dir.display().to_string(),
        ]
    }

    /// Return the minted tokens, refreshing the cache first when asked to or
    /// when there is none.
    pub async fn load(&self, force_refresh: bool) -> Result<Vec<TokenId>, MintListError> {
        let path = self.cache_path();
        let cached = tokio::fs::try_exists(&path).await.unwrap_or(false);

        if force_refresh || !cached {
            info!("Getting list of minted NFTs now, this may take a moment...");
            if !self.refresh().await {
                let still_cached = tokio::fs::try_exists(&path).await.unwrap_or(false);
                if !still_cached {
                    error!("Error getting list of minted NFTs, exiting...");
                    return Err(MintListError::Snapshot {
                        attempts: SNAPSHOT_ATTEMPTS,
                        path,
                    });
                }
                warn!("Snapshot failed, falling back to cached {}", path.display());
            }
        } else {
            info!("Using existing minted NFTs file.");
        }

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| MintListError::Read {
                path: path.clone(),
                source,
            })?;
        let tokens: Vec<TokenId> =
            serde_json::from_str(&raw).map_err(|source| MintListError::Malformed {
                path: path.clone(),
                source,
            })?;
        if tokens.is_empty() {
            return Err(MintListError::Empty { path });
        }
        info!("Loaded {} minted NFTs from {}", tokens.len(), path.display());
        Ok(tokens)
    }

    async fn refresh(&self) -> bool {
        let args = self.snapshot_args();
        for attempt in 1..=SNAPSHOT_ATTEMPTS {
            match self.runner.run(&args, self.timeout).await {
                None => {
                    warn!("Failed to get list of minted NFTs, retrying... ({attempt}/{SNAPSHOT_ATTEMPTS})");
                }
                Some(out) if !out.stderr.is_empty() => {
                    warn!("Error getting list of minted NFTs: {}", out.stderr);
                }
                Some(out) => {
                    info!("Got list of minted NFTs successfully!");
                    debug!("Response from getting minted NFTs: \"{}\"", out.stdout);
                    return true;
                }
            }
        }
        false
    }
}
