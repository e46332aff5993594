//! Innsikt CLI entry point.

use anyhow::Result;
use clap::Parser;
use innsikt::cli::{run_analyze, run_init, Cli, Commands};
use innsikt::config::Settings;
use innsikt::server::run_serve;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("innsikt={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the scratch directory exists
    std::fs::create_dir_all(settings.temp_dir())?;

    match &cli.command {
        Commands::Init => {
            run_init(&settings)?;
        }

        Commands::Analyze { url } => {
            run_analyze(url, settings).await?;
        }

        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| settings.server.host.clone());
            let port = port.unwrap_or(settings.server.port);
            run_serve(&host, port, settings).await?;
        }
    }

    Ok(())
}
