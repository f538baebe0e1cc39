mod api;
mod config;
mod engine;
mod models;
mod storage;
mod types;

use std::fs::File;
use std::io::{stderr, stdout, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::{Cli, Commands, ServeArgs, ServiceConfig};
use crate::engine::ClaimIngestor;
use crate::storage::{ClaimStore, MrfFileStorage};

/// Exit code of `validate` when at least one row was rejected.
const EXIT_ROW_ERRORS: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    match cli.command {
        Commands::Serve(args) => serve(&args).await,
        Commands::Validate(args) => validate(&args.path)
    }
}

async fn serve(args: &ServeArgs) -> Result<()> {
    let config = ServiceConfig::from(args);

    info!(
        "Publishing for '{}' every {} approved claims",
        config.reporting_entity.name, config.approval_threshold
    );

    let storage = Arc::new(MrfFileStorage::new());
    let store = Arc::new(ClaimStore::new(storage, &config));

    api::serve(&args.bind, store).await
}

fn validate(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;

    let timer = Instant::now();
    let report = ClaimIngestor::ingest_csv(BufReader::new(file))?;
    let duration = timer.elapsed();

    info!("Validated {} rows in: {duration:?}", report.total_row_count);

    let mut output = BufWriter::new(stdout().lock());
    serde_json::to_writer_pretty(&mut output, &report)?;
    writeln!(output)?;
    output.flush()?;

    if !report.row_errors.is_empty() {
        exit(EXIT_ROW_ERRORS);
    }

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the validation report, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
