//! CareLink CLI - command-line client for the CareLink portal

mod commands;

use anyhow::Result;
use carelink_client::{AuthService, ClientConfig, PortalClient};
use carelink_core::{FileStore, Session, StateDir};
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::sync::Arc;
use tracing::{Level, debug};

#[derive(Parser)]
#[command(name = "carelink")]
#[command(about = "Command-line client for the CareLink portal")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Base URL of the portal API (overrides the config file)
    #[arg(short = 'u', long, global = true, env = "CARELINK_BASE_URL")]
    base_url: Option<String>,

    /// Data directory for config and the persisted session
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    let state_dir = match &cli.data_dir {
        Some(dir) => StateDir::with_override(dir),
        None => StateDir::new(),
    };
    state_dir.create_directories()?;

    let config_path = state_dir.config_path();
    let mut config = if config_path.exists() {
        ClientConfig::load(&config_path)?
    } else {
        ClientConfig::default()
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = url::Url::parse(base_url)?;
    }
    debug!(base_url = %config.base_url, "using portal");

    let store = FileStore::open(state_dir.session_path())?;
    let session = Session::new(Arc::new(store));
    let client = PortalClient::builder()
        .base_url(config.base_url.as_str())
        .timeout(config.timeout())
        .build()?;
    let auth = AuthService::new(client, session);

    cli.command.execute(&auth).await
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
