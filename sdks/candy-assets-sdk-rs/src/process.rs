//! External command invocation

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::warn;

/// Captured result of one external command run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    /// stdout with newlines flattened to spaces
    pub stdout: String,
    /// stderr with newlines flattened to spaces
    pub stderr: String,
}

impl ProcessOutput {
    pub fn from_raw(success: bool, stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            success,
            stdout: flatten(stdout),
            stderr: flatten(stderr),
        }
    }
}

fn flatten(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace('\n', " ")
}

/// Runs the external tool with an argument list.
///
/// `None` means there is no result to classify: the process could not be
/// started, could not be waited on, or outlived `timeout`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[String], timeout: Duration) -> Option<ProcessOutput>;
}

/// Spawns a binary directly, without a shell, in the current directory.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
}

impl ProcessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, args: &[String], timeout: Duration) -> Option<ProcessOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => Some(ProcessOutput::from_raw(
                output.status.success(),
                &output.stdout,
                &output.stderr,
            )),
            Ok(Err(e)) => {
                warn!("failed to run {}: {e}", self.program.display());
                None
            }
            Err(_) => {
                warn!(
                    "{} did not finish within {}s",
                    self.program.display(),
                    timeout.as_secs()
                );
                None
            }
        }
    }
}
