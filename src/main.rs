use anyhow::{Context, Result};
use clap::Parser;
use resume_shortlist::cli::{handle_command, Cli};
use std::fs::OpenOptions;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // Stdout belongs to the session view, logs go to a file
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file: {}", config.log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file, using defaults"),
    }
    info!("Scoring service: {}", config.service_url);
    info!("Export directory: {}", config.export_dir.display());

    handle_command(cli, config).await
}
