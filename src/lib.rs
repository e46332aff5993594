//! Innsikt - Video Spoken-Content Analysis
//!
//! Turns a remote video's spoken content into structured insight and layers
//! an interactive quiz and Q&A experience over the resulting transcript.
//!
//! The name "Innsikt" comes from the Norwegian word for "insight."
//!
//! # Overview
//!
//! One analysis run downloads a video's audio, transcribes it, and derives:
//! - An extractive summary of the transcript
//! - Dominant topic phrases and keywords
//! - Named entities grouped by category
//!
//! The transcript is then held per user session, and later requests can
//! generate quizzes or answer questions against it without re-running the
//! expensive stages.
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `fetch` - Audio acquisition and scratch-file lifetime
//! - `transcription` - Speech-to-text transcription
//! - `insight` - Pure transcript analyses
//! - `orchestrator` - Pipeline coordination
//! - `session` - Per-session transcript storage
//! - `query` - Quiz generation and question answering
//! - `server` - HTTP shell
//!
//! # Example
//!
//! ```rust,no_run
//! use innsikt::config::Settings;
//! use innsikt::orchestrator::Orchestrator;
//! use innsikt::session::SessionStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let store = Arc::new(SessionStore::new());
//!     let orchestrator = Orchestrator::new(settings, store);
//!
//!     let result = orchestrator
//!         .analyze("session-1", "https://youtu.be/dQw4w9WgXcQ")
//!         .await?;
//!     println!("{}", result.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod insight;
pub mod openai;
pub mod orchestrator;
pub mod query;
pub mod server;
pub mod session;
pub mod transcription;

pub use error::{InnsiktError, Result};
