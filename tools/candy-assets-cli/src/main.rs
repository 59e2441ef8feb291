use anyhow::Context as _;
use candy_assets_sdk::{
    create_json_assets, rename_media_files, BatchOrchestrator, CollectionConfig, MetadataFetcher,
    MintListSource, ProcessRunner, RevealConfig, SolanaRpcClient, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RPC_URL, DEFAULT_UPDATER_PROGRAM,
};
use clap::{Args, Parser, Subcommand};
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{error, info, warn};
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "candy-assets",
    version,
    about = "Candy machine asset helper",
    long_about = "Generate metadata JSON for a numbered NFT collection, rename media files into the <n>.<ext> scheme,\nor reveal a minted collection by pointing every token's metadata URI at hosted JSON.\nLogs are written to stdout and optionally appended to a log file."
)]
struct Cli {
    /// Log at debug level, including raw responses from the updater
    #[arg(global = true, long, short)]
    verbose: bool,

    /// Also append log lines to this file
    #[arg(env = "CANDY_ASSETS_LOG_FILE", global = true, long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create one metadata JSON document per item
    #[command(
        alias = "json",
        about = "Create <n>.json metadata documents for every item in the collection"
    )]
    CreateJson(AssetsArgs),

    /// Rename prefixed media files
    #[command(about = "Rename <prefix><n>.<ext> media files to <n>.<ext>")]
    Rename(AssetsArgs),

    /// Reveal a minted collection
    #[command(
        alias = "reveal",
        about = "Point every minted NFT's metadata URI at <base-json-url>/<n>.json"
    )]
    UpdateUris(RevealArgs),
}

#[derive(Args, Debug)]
struct AssetsArgs {
    /// Collection config file (JSON)
    #[arg(env = "CANDY_ASSETS_CONFIG", long)]
    config: PathBuf,

    /// Directory holding media files and generated JSON documents
    #[arg(default_value = "assets", long)]
    assets_dir: PathBuf,
}

#[derive(Args, Debug)]
struct RevealArgs {
    /// Candy machine id whose minted tokens are updated
    #[arg(env = "CANDY_MACHINE_ID", long)]
    candy_machine_id: String,

    /// Base URL hosting the revealed <n>.json documents
    #[arg(env = "BASE_JSON_URL", long)]
    base_json_url: String,

    /// RPC endpoint used to read on-chain metadata
    #[arg(default_value = DEFAULT_RPC_URL, env = "SOLANA_RPC", long)]
    rpc: String,

    /// External updater binary (metaboss compatible)
    #[arg(default_value = DEFAULT_UPDATER_PROGRAM, env = "CANDY_ASSETS_UPDATER", long)]
    updater: PathBuf,

    /// Directory for the minted-token cache and results reports
    #[arg(default_value = ".", long)]
    work_dir: PathBuf,

    /// Timeout for each updater invocation, in seconds
    #[arg(default_value_t = 240, long)]
    timeout_secs: u64,

    /// Attempts per token before giving up
    #[arg(default_value_t = DEFAULT_MAX_ATTEMPTS, long)]
    max_attempts: u32,

    /// Regenerate the minted-token cache even if one exists
    #[arg(long)]
    refresh: bool,
}

impl RevealArgs {
    fn into_config(self) -> RevealConfig {
        let mut config = RevealConfig::new(self.candy_machine_id, self.base_json_url);
        config.rpc_url = self.rpc;
        config.updater_program = self.updater;
        config.work_dir = self.work_dir;
        config.update_timeout = Duration::from_secs(self.timeout_secs);
        config.max_attempts = self.max_attempts;
        config.force_refresh = self.refresh;
        config
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(level)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stdout),
        )
        .with(file_layer)
        .try_init()
        .context("install log subscriber")?;
    Ok(())
}

async fn create_json(args: AssetsArgs) -> anyhow::Result<()> {
    let config = CollectionConfig::from_path(&args.config)?;
    tokio::fs::create_dir_all(&args.assets_dir)
        .await
        .with_context(|| format!("create {}", args.assets_dir.display()))?;

    let report = create_json_assets(&config, &args.assets_dir).await;
    anyhow::ensure!(
        report.failed.is_empty(),
        "{} of {} json assets could not be written",
        report.failed.len(),
        config.supply
    );
    Ok(())
}

async fn rename(args: AssetsArgs) -> anyhow::Result<()> {
    let config = CollectionConfig::from_path(&args.config)?;
    config.validate_for_rename()?;

    let report = rename_media_files(
        &args.assets_dir,
        &config.original_filename_prefix,
        config.supply,
    )
    .await;
    anyhow::ensure!(
        report.failed.is_empty(),
        "{} renames failed",
        report.failed.len()
    );
    Ok(())
}

async fn update_uris(args: RevealArgs) -> anyhow::Result<()> {
    let config = args.into_config();
    config.validate().context("invalid reveal configuration")?;

    let runner = ProcessRunner::new(&config.updater_program);
    let tokens = MintListSource::new(runner.clone(), &config.batch_id, &config.work_dir)
        .with_timeout(config.update_timeout)
        .load(config.force_refresh)
        .await
        .context("Error getting list of minted NFTs")?;

    let fetcher = MetadataFetcher::new(SolanaRpcClient::new(&config.rpc_url));
    let orchestrator = BatchOrchestrator::new(config, fetcher, runner)?;
    let report = orchestrator.run(&tokens).await?;

    info!(
        "Reveal finished: {} updated, {} failed",
        report.success, report.fail
    );
    if report.path.is_none() {
        warn!("Results were only logged, the report file could not be written");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv().ok();
    let args = Cli::parse();
    init_logging(args.verbose, args.log_file.as_deref())?;

    let started = Instant::now();
    let result = match args.command {
        Commands::CreateJson(assets) => create_json(assets).await,
        Commands::Rename(assets) => rename(assets).await,
        Commands::UpdateUris(reveal) => update_uris(reveal).await,
    };
    if let Err(e) = &result {
        error!("{e:#}");
    }
    info!("Exiting after {} seconds!", started.elapsed().as_secs());
    result
}
