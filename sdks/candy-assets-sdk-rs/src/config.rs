//! Immutable run configuration for the templating, rename, and reveal modes.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError, DEFAULT_MAX_ATTEMPTS, DEFAULT_RPC_URL, DEFAULT_UPDATER_PROGRAM,
    DEFAULT_UPDATE_TIMEOUT,
};

/// Upper bound for royalties expressed in basis points (100%).
pub const MAX_SELLER_FEE_BASIS_POINTS: u16 = 10_000;

/// Creator shares must add up to exactly this.
pub const TOTAL_CREATOR_SHARES: u32 = 100;

/// Wallet receiving a share of mint proceeds and royalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub address: String,
    pub share: u8,
}

/// One trait attached to every generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// Video companion files; image files are still required as a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConfig {
    pub base_url: String,
    pub extension: String,
}

fn default_image_extension() -> String {
    "png".to_string()
}

/// Collection-wide values used by the templating and rename modes.
///
/// Loaded once from a JSON file and validated before any file is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Each document is named `"<nft_name> #<n>"`
    pub nft_name: String,
    pub collection_name: String,
    #[serde(default)]
    pub family_name: String,
    pub supply: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
    pub base_image_url: String,
    #[serde(default = "default_image_extension")]
    pub image_extension: String,
    #[serde(default)]
    pub video: Option<VideoConfig>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Static prefix of media files awaiting rename, e.g. `IMG_`
    #[serde(default)]
    pub original_filename_prefix: String,
}

impl CollectionConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Invalid {
            field: "config",
            reason: format!("{}: {e}", path.display()),
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| ConfigError::Invalid {
            field: "config",
            reason: format!("{}: {e}", path.display()),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supply == 0 {
            return Err(ConfigError::Invalid {
                field: "supply",
                reason: "must be positive".into(),
            });
        }
        if self.seller_fee_basis_points > MAX_SELLER_FEE_BASIS_POINTS {
            return Err(ConfigError::Invalid {
                field: "seller_fee_basis_points",
                reason: format!(
                    "{} exceeds {MAX_SELLER_FEE_BASIS_POINTS}",
                    self.seller_fee_basis_points
                ),
            });
        }
        let shares: u32 = self.creators.iter().map(|c| u32::from(c.share)).sum();
        if shares != TOTAL_CREATOR_SHARES {
            return Err(ConfigError::Invalid {
                field: "creators",
                reason: format!("shares sum to {shares}, expected {TOTAL_CREATOR_SHARES}"),
            });
        }
        if self.creators.iter().any(|c| c.address.trim().is_empty()) {
            return Err(ConfigError::Missing("creators.address"));
        }
        if self.base_image_url.trim().is_empty() {
            return Err(ConfigError::Missing("base_image_url"));
        }
        if self.image_extension.trim().is_empty() {
            return Err(ConfigError::Missing("image_extension"));
        }
        if let Some(video) = &self.video {
            if video.base_url.trim().is_empty() {
                return Err(ConfigError::Missing("video.base_url"));
            }
            if video.extension.trim().is_empty() {
                return Err(ConfigError::Missing("video.extension"));
            }
        }
        Ok(())
    }

    /// Rename mode needs a prefix to strip.
    pub fn validate_for_rename(&self) -> Result<(), ConfigError> {
        if self.supply == 0 {
            return Err(ConfigError::Invalid {
                field: "supply",
                reason: "must be positive".into(),
            });
        }
        if self.original_filename_prefix.is_empty() {
            return Err(ConfigError::Missing("original_filename_prefix"));
        }
        Ok(())
    }
}

/// Settings for one batch reveal run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealConfig {
    /// Candy machine id; names the mint cache and the results file
    pub batch_id: String,
    /// Base URL hosting the revealed `<ordinal>.json` documents
    pub base_json_url: String,
    pub rpc_url: String,
    pub updater_program: PathBuf,
    /// Directory holding the mint cache and results reports
    pub work_dir: PathBuf,
    pub update_timeout: Duration,
    pub max_attempts: u32,
    /// Regenerate the minted-token cache even if one exists
    pub force_refresh: bool,
}

impl RevealConfig {
    pub fn new(batch_id: impl Into<String>, base_json_url: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            base_json_url: base_json_url.into(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            updater_program: PathBuf::from(DEFAULT_UPDATER_PROGRAM),
            work_dir: PathBuf::from("."),
            update_timeout: DEFAULT_UPDATE_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            force_refresh: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_id.trim().is_empty() {
            return Err(ConfigError::Missing("batch_id"));
        }
        let base = self.base_json_url.trim();
        if base.is_empty() {
            return Err(ConfigError::Missing("base_json_url"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "base_json_url",
                reason: format!("{base:?} is not an http(s) url"),
            });
        }
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::Missing("rpc_url"));
        }
        if self.updater_program.as_os_str().is_empty() {
            return Err(ConfigError::Missing("updater_program"));
        }
        if self.update_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "update_timeout",
                reason: "must be positive".into(),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "max_attempts",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
