//! candidates-api - Candidate management service
//!
//! Serves the candidate CRUD and spreadsheet ingestion API, or previews
//! how a spreadsheet would be ingested without touching the database.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use candidates_common::config::{
    load_toml_config, resolve_root_folder, ConfigOverrides, ConfigSource, ServiceConfig,
    CONFIG_FILE_NAME,
};
use candidates_common::ingest::{self, decode_workbook, Overrides, SheetFormat};
use candidates_common::{db, CandidateInput};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use candidates_api::{build_router, AppState};

/// Command-line arguments for candidates-api
#[derive(Parser, Debug)]
#[command(name = "candidates-api")]
#[command(about = "Candidate management service with spreadsheet ingestion")]
#[command(version)]
struct Args {
    /// Data root folder (database and config live here)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file (default: <root>/candidates.toml)
    #[arg(short, long, env = "CANDIDATES_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "CANDIDATES_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CANDIDATES_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long, env = "CANDIDATES_DATABASE")]
    database: Option<PathBuf>,

    /// Largest accepted upload in bytes
    #[arg(long, env = "CANDIDATES_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CANDIDATES_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Decode a spreadsheet and print the normalized records as JSON
    Preview {
        /// Spreadsheet file (.xlsx, .xls, .ods or .csv)
        file: PathBuf,

        /// Require exactly one data row, as the single-candidate upload does
        #[arg(long)]
        strict: bool,
    },
}

/// One previewed record with its validation outcome
#[derive(Debug, Serialize)]
struct PreviewRecord {
    row: usize,
    record: CandidateInput,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref());
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| root_folder.join(CONFIG_FILE_NAME));
    let (toml, config_source) = load_toml_config(&config_path)?;

    let overrides = ConfigOverrides {
        host: args.host,
        port: args.port,
        database_path: args.database,
        max_upload_bytes: args.max_upload_bytes,
        log_level: args.log_level,
    };
    let config = ServiceConfig::resolve(root_folder, toml, overrides);

    init_tracing(&config.log_level);

    match config_source {
        ConfigSource::File => info!("Loaded config from {}", config_path.display()),
        ConfigSource::Defaults => warn!(
            "Config file not found at {}, using defaults",
            config_path.display()
        ),
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Preview { file, strict } => preview(&file, strict),
    }
}

/// Initialize tracing; RUST_LOG wins over the configured level
fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "candidates_api={level},candidates_common={level},tower_http={level}"
                )
                .into()
            }),
        )
        // stderr keeps `preview` output on stdout parseable
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(config: ServiceConfig) -> Result<()> {
    info!(
        "Starting candidates-api v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Root folder: {}", config.root_folder.display());
    info!("Database path: {}", config.database_path.display());

    let pool = match db::init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool, config.max_upload_bytes);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("candidates-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn preview(file: &Path, strict: bool) -> Result<()> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file.file_name().and_then(|n| n.to_str());
    let format = SheetFormat::detect(file_name, None)?;
    let rows = decode_workbook(&bytes, format)?;

    let inputs = if strict {
        vec![ingest::ingest_single(rows, &Overrides::none())?]
    } else {
        ingest::ingest_bulk(rows)?
    };

    let records: Vec<PreviewRecord> = inputs
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let error = record.validate().err().map(|e| e.to_string());
            PreviewRecord {
                row: index + 1,
                valid: error.is_none(),
                record,
                error,
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
