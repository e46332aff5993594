//! CLI for Innsikt.

use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::SessionStore;
use clap::{Parser, Subcommand};
use std::sync::Arc;

/// Innsikt - Video Spoken-Content Analysis
///
/// Turns a video's spoken content into a summary, topics, keywords and named
/// entities, and serves an interactive quiz and Q&A experience over the
/// captured transcript. The name "Innsikt" comes from the Norwegian word for
/// "insight."
#[derive(Parser, Debug)]
#[command(name = "innsikt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the configuration file with current values
    Init,

    /// Analyze a single video and print the result as JSON
    Analyze {
        /// YouTube URL of the video
        url: String,
    },

    /// Start the HTTP server
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Write the active settings to the default configuration file location.
pub fn run_init(settings: &Settings) -> crate::error::Result<()> {
    let path = Settings::default_config_path();
    settings.save_to(&path)?;
    println!("Configuration written to {}", path.display());
    Ok(())
}

/// Run a one-shot analysis and print the result as pretty JSON.
pub async fn run_analyze(url: &str, settings: Settings) -> crate::error::Result<()> {
    let store = Arc::new(SessionStore::new());
    let orchestrator = Orchestrator::new(settings, store);

    let result = orchestrator.analyze("cli", url).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
