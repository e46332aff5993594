//! Speech-to-text transcription.
//!
//! Converts a scratch audio asset into a [`Transcript`] via OpenAI Whisper.
//! Empty recognized text is a domain error, never an empty-string success.

use crate::error::TranscriptionError;
use crate::fetch::AudioAsset;
use crate::openai::create_client;
use async_openai::types::{AudioInput, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Immutable transcript text, produced once per pipeline run.
///
/// Non-empty by construction: the only way to build one from engine output is
/// [`Transcript::from_recognized_text`], which rejects silence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    /// Wrap recognized text, failing when no speech was detected.
    pub fn from_recognized_text(text: &str) -> Result<Self, TranscriptionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TranscriptionError::NoSpeechDetected);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio asset into plain text.
    async fn transcribe(&self, asset: &AudioAsset) -> Result<Transcript, TranscriptionError>;
}

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    language: Option<String>,
}

impl WhisperTranscriber {
    /// Create a transcriber for the given model, with an optional language hint.
    pub fn new(model: &str, language: Option<String>) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            language,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self, asset), fields(audio_path = %asset.path().display()))]
    async fn transcribe(&self, asset: &AudioAsset) -> Result<Transcript, TranscriptionError> {
        // Precondition check, not delegated to the engine.
        if !asset.path().exists() {
            return Err(TranscriptionError::AssetMissing(asset.path().to_path_buf()));
        }

        let file_bytes = tokio::fs::read(asset.path())
            .await
            .map_err(|e| TranscriptionError::EngineFailure(format!("Failed to read audio: {e}")))?;

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(
                asset
                    .path()
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model);

        if let Some(lang) = &self.language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| TranscriptionError::EngineFailure(format!("Failed to build request: {e}")))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| TranscriptionError::EngineFailure(format!("Whisper API error: {e}")))?;

        debug!("Recognized {} characters", response.text.len());
        Transcript::from_recognized_text(&response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    #[test]
    fn test_empty_text_is_no_speech() {
        assert!(matches!(
            Transcript::from_recognized_text(""),
            Err(TranscriptionError::NoSpeechDetected)
        ));
        assert!(matches!(
            Transcript::from_recognized_text("   \n\t "),
            Err(TranscriptionError::NoSpeechDetected)
        ));
    }

    #[test]
    fn test_recognized_text_is_trimmed() {
        let t = Transcript::from_recognized_text("  hello world \n").unwrap();
        assert_eq!(t.as_str(), "hello world");
    }

    #[tokio::test]
    async fn test_missing_asset_fails_before_engine_call() {
        let transcriber = WhisperTranscriber::new("whisper-1", None);
        let asset = AudioAsset::new(PathBuf::from("/nonexistent/audio.mp3"), Uuid::new_v4());

        // Fails on the precondition, so no network access happens.
        let err = transcriber.transcribe(&asset).await.unwrap_err();
        assert!(matches!(err, TranscriptionError::AssetMissing(_)));
    }
}
