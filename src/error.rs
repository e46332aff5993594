//! Error types for Innsikt.
//!
//! Each pipeline component has its own error taxonomy so callers can tell
//! fatal failures apart from degrading ones. `InnsiktError` is the
//! crate-level umbrella used at the library boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the resource fetcher.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Video not found or unavailable")]
    NotFound,

    #[error("yt-dlp is not installed or not in your PATH")]
    ToolMissing,

    #[error("Audio download failed: {0}")]
    ExternalFailure(String),
}

/// Errors from the transcription adapter.
#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("Audio file not found at {0}")]
    AssetMissing(PathBuf),

    #[error("Transcription produced no text. The video may have no speech.")]
    NoSpeechDetected,

    #[error("Transcription failed: {0}")]
    EngineFailure(String),
}

/// Errors from the knowledge query service.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("OPENAI_API_KEY is not configured")]
    MissingCredential,

    #[error("Language model service unavailable: {0}")]
    ExternalUnavailable(String),

    /// Carries the raw model output for logging; the Display form stays short
    /// so nothing bulky leaks into user-facing messages.
    #[error("Language model returned a malformed response")]
    MalformedResponse(String),
}

/// Library-level error type for Innsikt operations.
#[derive(Error, Debug)]
pub enum InnsiktError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Innsikt operations.
pub type Result<T> = std::result::Result<T, InnsiktError>;
