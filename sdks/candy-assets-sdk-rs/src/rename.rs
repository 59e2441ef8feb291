//! Media rename: `<prefix><i>.<ext>` becomes `<i>.<ext>`.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use futures::future::join_all;
use tracing::{debug, info, warn};

/// Extensions tried for every index, in order.
pub const MEDIA_EXTENSIONS: [&str; 5] = ["gif", "png", "jpeg", "jpg", "mp4"];

/// Tally of every rename attempted.
#[derive(Debug, Default)]
pub struct RenameReport {
    pub renamed: Vec<PathBuf>,
    /// Attempts whose source file did not exist
    pub missing: usize,
    pub failed: Vec<(PathBuf, std::io::Error)>,
}

enum Attempt {
    Renamed(PathBuf),
    Missing,
    Failed(PathBuf, std::io::Error),
}

async fn rename_one(assets_dir: &Path, prefix: &str, index: u32, ext: &str) -> Attempt {
    let from = assets_dir.join(format!("{prefix}{index}.{ext}"));
    let to = assets_dir.join(format!("{index}.{ext}"));
    match tokio::fs::rename(&from, &to).await {
        Ok(()) => {
            debug!("Renamed {} -> {}", from.display(), to.display());
            Attempt::Renamed(to)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Attempt::Missing,
        Err(e) => Attempt::Failed(from, e),
    }
}

async fn rename_group(assets_dir: &Path, prefix: &str, index: u32) -> Vec<Attempt> {
    let mut attempts = Vec::with_capacity(MEDIA_EXTENSIONS.len());
    for ext in MEDIA_EXTENSIONS {
        attempts.push(rename_one(assets_dir, prefix, index, ext).await);
    }
    info!("Renamed asset group #{index}");
    attempts
}

/// Rename every `<prefix><i>.<ext>` in `assets_dir` for `i` in `0..supply`.
pub async fn rename_media_files(assets_dir: &Path, prefix: &str, supply: u32) -> RenameReport {
    let groups = join_all((0..supply).map(|i| rename_group(assets_dir, prefix, i))).await;

    let mut report = RenameReport::default();
    for attempt in groups.into_iter().flatten() {
        match attempt {
            Attempt::Renamed(path) => report.renamed.push(path),
            Attempt::Missing => report.missing += 1,
            Attempt::Failed(path, e) => {
                warn!("Failed to rename {}: {e}", path.display());
                report.failed.push((path, e));
            }
        }
    }
    info!(
        "Renamed {} files ({} missing, {} failed)",
        report.renamed.len(),
        report.missing,
        report.failed.len()
    );
    report
}
