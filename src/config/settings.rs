//! Configuration settings for Innsikt.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub transcription: TranscriptionSettings,
    pub analysis: AnalysisSettings,
    pub query: QuerySettings,
    pub server: ServerSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for scratch audio files.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Directory for custom prompt templates (overrides defaults).
    pub prompts_dir: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/innsikt".to_string(),
            log_level: "info".to_string(),
            prompts_dir: None,
        }
    }
}

/// Transcription service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whisper model to use.
    pub model: String,
    /// Optional language hint passed to the engine.
    pub language: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            language: None,
        }
    }
}

/// Transcript analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Number of sentences in the extractive summary.
    pub summary_sentences: usize,
    /// Number of topic phrases to surface.
    pub topic_count: usize,
    /// Number of terms per topic phrase.
    pub topic_terms: usize,
    /// Minimum token count required before fitting a topic model.
    pub min_topic_tokens: usize,
    /// Number of keywords to extract.
    pub keyword_count: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            summary_sentences: 5,
            topic_count: 3,
            topic_terms: 5,
            min_topic_tokens: 20,
            keyword_count: 10,
        }
    }
}

/// Knowledge query (quiz and Q&A) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// LLM model for quiz generation and question answering.
    pub model: String,
    /// Transcript character budget sent to the model. Truncation keeps the
    /// prefix, so only the start of long transcripts is eligible for questions.
    pub max_transcript_chars: usize,
    /// Number of questions in a generated quiz.
    pub quiz_questions: usize,
    /// Deadline for a single language-model call, in seconds.
    pub timeout_seconds: u64,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_transcript_chars: 8000,
            quiz_questions: 5,
            timeout_seconds: 60,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::InnsiktError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("innsikt")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}
