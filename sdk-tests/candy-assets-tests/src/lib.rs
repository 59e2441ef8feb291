use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use candy_assets_sdk::{
    CommandRunner, FetchError, MetadataDocument, MetadataSource, ProcessOutput, RevealConfig,
    TokenId,
};

pub const BASE_JSON_URL: &str = "https://json.example/reveal";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Reveal config rooted at `work_dir` with the default retry budget.
pub fn reveal_config(work_dir: &Path) -> RevealConfig {
    let mut config = RevealConfig::new("CandyMachine1", BASE_JSON_URL);
    config.work_dir = work_dir.to_path_buf();
    config.update_timeout = Duration::from_secs(30);
    config
}

pub fn tokens(ids: &[&str]) -> Vec<TokenId> {
    ids.iter().map(|id| TokenId::from(*id)).collect()
}

pub fn updated() -> Option<ProcessOutput> {
    Some(ProcessOutput::from_raw(true, b"updated\n", b""))
}

pub fn stderr(text: &str) -> Option<ProcessOutput> {
    Some(ProcessOutput::from_raw(false, b"", text.as_bytes()))
}

type FetchResult = Result<MetadataDocument, FetchError>;

#[derive(Default)]
struct MetadataState {
    names: HashMap<String, String>,
    scripted: HashMap<String, VecDeque<FetchResult>>,
    calls: HashMap<String, usize>,
}

/// Metadata source answering from a per-token script.
///
/// Scripted results are consumed first; after that the token's steady name
/// is served, and tokens with neither report `AccountNotFound`.
#[derive(Clone, Default)]
pub struct ScriptedMetadata {
    state: Arc<Mutex<MetadataState>>,
}

impl ScriptedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(self, token: &str, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .names
            .insert(token.to_string(), name.to_string());
        self
    }

    pub fn then(self, token: &str, result: FetchResult) -> Self {
        self.state
            .lock()
            .unwrap()
            .scripted
            .entry(token.to_string())
            .or_default()
            .push_back(result);
        self
    }

    pub fn calls(&self, token: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(token)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl MetadataSource for ScriptedMetadata {
    async fn fetch(&self, token: &TokenId) -> FetchResult {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(token.to_string()).or_default() += 1;

        if let Some(result) = state
            .scripted
            .get_mut(token.as_str())
            .and_then(VecDeque::pop_front)
        {
            return result;
        }
        match state.names.get(token.as_str()) {
            Some(name) => Ok(MetadataDocument::new(
                name.clone(),
                format!("https://arweave.example/{token}"),
            )),
            None => Err(FetchError::AccountNotFound(token.to_string())),
        }
    }
}

#[derive(Default)]
struct RunnerState {
    calls: Vec<Vec<String>>,
    per_token: HashMap<String, VecDeque<Option<ProcessOutput>>>,
    fallback: Option<ProcessOutput>,
    snapshot: VecDeque<Option<ProcessOutput>>,
    snapshot_file: Option<(PathBuf, String)>,
}

/// Stands in for the external updater binary.
///
/// `update uri` calls answer from the per-token queue, then the fallback.
/// `snapshot mints` calls answer from the snapshot queue and, on success,
/// write the configured cache file the way the real tool would.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    state: Arc<Mutex<RunnerState>>,
}

impl ScriptedRunner {
    /// Every update succeeds unless scripted otherwise.
    pub fn succeeding() -> Self {
        Self::answering(updated())
    }

    pub fn answering(fallback: Option<ProcessOutput>) -> Self {
        let runner = Self::default();
        runner.state.lock().unwrap().fallback = fallback;
        runner
    }

    pub fn then(self, token: &str, output: Option<ProcessOutput>) -> Self {
        self.state
            .lock()
            .unwrap()
            .per_token
            .entry(token.to_string())
            .or_default()
            .push_back(output);
        self
    }

    pub fn snapshot_then(self, output: Option<ProcessOutput>) -> Self {
        self.state.lock().unwrap().snapshot.push_back(output);
        self
    }

    pub fn snapshot_writes(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.state.lock().unwrap().snapshot_file = Some((path.into(), contents.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().calls.clone()
    }

    /// `--account` values of every `update uri` call, in order.
    pub fn updated_accounts(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|args| flag_value(args, "--account"))
            .collect()
    }

    /// `--new-uri` values of every `update uri` call, in order.
    pub fn new_uris(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|args| flag_value(args, "--new-uri"))
            .collect()
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[String], _timeout: Duration) -> Option<ProcessOutput> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(args.to_vec());

        if args.first().map(String::as_str) == Some("snapshot") {
            let output = state.snapshot.pop_front().unwrap_or(None);
            let ok = matches!(&output, Some(out) if out.stderr.is_empty());
            if ok {
                if let Some((path, contents)) = &state.snapshot_file {
                    std::fs::write(path, contents).unwrap();
                }
            }
            return output;
        }

        let token = flag_value(args, "--account").unwrap_or_default();
        if let Some(output) = state.per_token.get_mut(&token).and_then(VecDeque::pop_front) {
            return output;
        }
        state.fallback.clone()
    }
}
