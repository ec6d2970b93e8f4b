use anyhow::Result;
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod cli;
mod config;
mod i18n;
mod screens;
mod tui;
mod version;

use cli::Cli;
use config::Config;

const LOG_FILE: &str = "carelog.log";

#[tokio::main]
async fn main() {
    // Put the terminal back before reporting a panic
    std::panic::set_hook(Box::new(|panic_info| {
        tui::reset_terminal();
        eprintln!("Application panicked: {}", panic_info);
        error!("Application panicked: {}", panic_info);
        std::process::exit(1);
    }));

    // Load environment variables from .env file
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match Config::init().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = init_logging(&config.data_dir, cli.debug) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = dotenv {
        // Don't error if .env file doesn't exist, just log it
        tracing::debug!("No .env file found or error loading it: {}", e);
    }

    info!("Starting {}", version::full_version());

    if let Err(e) = cli.execute(config).await {
        error!("Application error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to a file so they never draw over the terminal UI.
/// Falls back to stderr when the log directory is not writable.
fn init_logging(data_dir: &Path, debug: bool) -> Result<()> {
    let default_filter = if debug { "carelog=debug" } else { "carelog=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let log_file = fs::create_dir_all(data_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(data_dir.join(LOG_FILE))
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match log_file {
        Ok(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .try_init(),
        Err(_) => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}
