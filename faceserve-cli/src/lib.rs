//! faceserve CLI

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use faceserve_core::config::Config;
use faceserve_core::index::FontIndex;
use faceserve_core::output::{write_json_pretty, write_ndjson};
use faceserve_core::pipeline::Indexer;
use faceserve_core::weight::infer_weight;

pub mod cache;
pub mod server;

/// CLI entrypoint for faceserve.
#[derive(Debug, Parser)]
#[command(
    name = "faceserve",
    version,
    about = "Self-hosted web font server: indexes font files and serves @font-face CSS"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Index the configured directories and serve fonts over HTTP
    Serve(ServeArgs),
    /// One-shot scan: discover fonts and print their metadata
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Path to the YAML configuration file
    #[arg(
        short = 'c',
        long = "config",
        default_value = "faceserve.yaml",
        value_hint = ValueHint::FilePath
    )]
    config: PathBuf,

    /// Host address to bind
    #[arg(long = "host", default_value = "0.0.0.0")]
    host: String,
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Directories or files to scan
    #[arg(required = true, value_hint = ValueHint::DirPath)]
    paths: Vec<PathBuf>,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => run_serve(args),
        Command::Scan(args) => run_scan(args),
    }
}

fn run_serve(args: ServeArgs) -> Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    config.validate_for_serve()?;

    init_logging(&config)?;
    log::info!("starting faceserve {}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(config);
    let index = Arc::new(FontIndex::new());
    let indexer = Indexer::new(Arc::clone(&index), Arc::clone(&config));

    let loaded = indexer.bulk_load(&config.global.directories)?;
    log::info!(
        "indexed {loaded} fonts from {} directories",
        config.global.directories.len()
    );

    // Keep the subscription alive for the whole serving lifetime; dropping
    // the guard on any exit path unsubscribes and joins the worker.
    let _watcher = indexer.watch(&config.global.directories)?;

    let bind = format!("{}:{}", args.host, config.global.port);
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(server::serve(&bind, index, &config))
}

fn init_logging(config: &Config) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if let Some(path) = &config.global.logs.access {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn run_scan(args: ScanArgs) -> Result<()> {
    // Surface per-file warnings on stderr; RUST_LOG still overrides.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    // Scanning carries no config, so identity falls back to the obfuscated
    // default.
    let indexer = Indexer::new(Arc::new(FontIndex::new()), Arc::new(Config::default()));
    let records = indexer.scan_records(&args.paths)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.json {
        write_json_pretty(&records, &mut handle)?;
    } else if args.ndjson {
        write_ndjson(&records, &mut handle)?;
    } else {
        write_plain(&records, &mut handle)?;
    }

    Ok(())
}

fn write_plain(records: &[faceserve_core::index::FontRecord], mut w: impl Write) -> Result<()> {
    for record in records {
        writeln!(
            w,
            "{}  {}  {}",
            record.path.display(),
            record.full_name,
            infer_weight(&record.subfamily_name, &record.full_name)
        )?;
    }
    Ok(())
}
