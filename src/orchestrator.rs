//! Pipeline orchestrator.
//!
//! Sequences fetch -> transcription -> analysis for one video reference,
//! guarantees scratch-audio cleanup on every exit path, and publishes the
//! transcript to the session store only when the whole run succeeds.

use crate::config::Settings;
use crate::error::{InnsiktError, Result};
use crate::fetch::{AudioFetcher, YtDlpFetcher};
use crate::insight::{extract_entities, extract_keywords, extract_topics, summarize};
use crate::session::SessionStore;
use crate::transcription::{Transcriber, Transcript, WhisperTranscriber};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Stages of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Fetching,
    Transcribing,
    Analyzing,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Fetching => "fetching",
            PipelineStage::Transcribing => "transcribing",
            PipelineStage::Analyzing => "analyzing",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Aggregate result of one pipeline run.
///
/// Every field derives solely from the one transcript the result carries;
/// the aggregate either exists whole or the run failed.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub topics: Vec<String>,
    pub keywords: Vec<String>,
    pub named_entities: HashMap<String, Vec<String>>,
    pub transcript: Transcript,
}

/// The main orchestrator for the analysis pipeline.
pub struct Orchestrator {
    settings: Settings,
    fetcher: Arc<dyn AudioFetcher>,
    transcriber: Arc<dyn Transcriber>,
    store: Arc<SessionStore>,
}

impl Orchestrator {
    /// Create an orchestrator with the default yt-dlp and Whisper components.
    pub fn new(settings: Settings, store: Arc<SessionStore>) -> Self {
        let fetcher = Arc::new(YtDlpFetcher::new(settings.temp_dir()));
        let transcriber = Arc::new(WhisperTranscriber::new(
            &settings.transcription.model,
            settings.transcription.language.clone(),
        ));
        Self {
            settings,
            fetcher,
            transcriber,
            store,
        }
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        fetcher: Arc<dyn AudioFetcher>,
        transcriber: Arc<dyn Transcriber>,
        store: Arc<SessionStore>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            transcriber,
            store,
        }
    }

    /// Get a reference to the session store.
    pub fn store(&self) -> Arc<SessionStore> {
        self.store.clone()
    }

    /// Run the full pipeline for one video reference.
    ///
    /// Fetch and transcription failures are fatal to the run. Insight
    /// extractor failures only degrade their own field. A failed run leaves
    /// any previously stored session transcript untouched, and the scratch
    /// audio file is removed however the run ends.
    #[instrument(skip(self), fields(session_id = %session_id, video_ref = %video_ref))]
    pub async fn analyze(&self, session_id: &str, video_ref: &str) -> Result<AnalysisResult> {
        if video_ref.trim().is_empty() {
            return Err(InnsiktError::InvalidInput(
                "Please enter a YouTube URL.".into(),
            ));
        }

        let mut stage = PipelineStage::Fetching;
        debug!("Pipeline stage: {stage}");

        // The asset's Drop removes the scratch file on every path out of
        // this function, including the early error returns below.
        let asset = match self.fetcher.fetch(video_ref).await {
            Ok(asset) => asset,
            Err(e) => {
                warn!("Pipeline failed while {stage}: {e}");
                return Err(e.into());
            }
        };

        stage = PipelineStage::Transcribing;
        debug!("Pipeline stage: {stage}");

        let transcript = match self.transcriber.transcribe(&asset).await {
            Ok(transcript) => transcript,
            Err(e) => {
                warn!("Pipeline failed while {stage}: {e}");
                return Err(e.into());
            }
        };

        // Transcript in hand; the scratch file has served its purpose.
        drop(asset);

        stage = PipelineStage::Analyzing;
        debug!("Pipeline stage: {stage}");

        let result = self.analyze_transcript(transcript);

        self.store.put(session_id, result.transcript.clone());

        stage = PipelineStage::Done;
        info!("Pipeline stage: {stage}");
        Ok(result)
    }

    /// Fan the transcript out to the insight extractors.
    ///
    /// Each extractor is independent; a failing one contributes its
    /// explanatory placeholder without affecting the others.
    fn analyze_transcript(&self, transcript: Transcript) -> AnalysisResult {
        let analysis = &self.settings.analysis;
        let text = transcript.as_str();

        let summary =
            summarize(text, analysis.summary_sentences).unwrap_or_else(|d| d.to_string());

        let topics = extract_topics(
            text,
            analysis.topic_count,
            analysis.topic_terms,
            analysis.min_topic_tokens,
        )
        .unwrap_or_else(|d| vec![d.to_string()]);

        let keywords = extract_keywords(text, analysis.keyword_count).unwrap_or_else(|d| {
            debug!("Keyword extraction degraded: {d}");
            Vec::new()
        });

        let named_entities = extract_entities(text);

        AnalysisResult {
            summary,
            topics,
            keywords,
            named_entities,
            transcript,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, TranscriptionError};
    use crate::fetch::AudioAsset;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Fetcher that writes a real scratch file and records its path.
    struct FileFetcher {
        dir: PathBuf,
        created: Arc<Mutex<Vec<PathBuf>>>,
    }

    #[async_trait]
    impl AudioFetcher for FileFetcher {
        async fn fetch(&self, _video_ref: &str) -> std::result::Result<AudioAsset, FetchError> {
            let id = Uuid::new_v4();
            let path = self.dir.join(format!("audio_{}.mp3", id));
            std::fs::write(&path, b"fake audio")
                .map_err(|e| FetchError::ExternalFailure(e.to_string()))?;
            self.created.lock().unwrap().push(path.clone());
            Ok(AudioAsset::new(path, id))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl AudioFetcher for FailingFetcher {
        async fn fetch(&self, _video_ref: &str) -> std::result::Result<AudioAsset, FetchError> {
            Err(FetchError::NotFound)
        }
    }

    struct FixedTranscriber {
        text: String,
    }

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(
            &self,
            asset: &AudioAsset,
        ) -> std::result::Result<Transcript, TranscriptionError> {
            assert!(asset.path().exists(), "asset must exist while transcribing");
            Transcript::from_recognized_text(&self.text)
        }
    }

    struct SilentTranscriber;

    #[async_trait]
    impl Transcriber for SilentTranscriber {
        async fn transcribe(
            &self,
            _asset: &AudioAsset,
        ) -> std::result::Result<Transcript, TranscriptionError> {
            Err(TranscriptionError::NoSpeechDetected)
        }
    }

    fn orchestrator_with(
        dir: &tempfile::TempDir,
        transcriber: Arc<dyn Transcriber>,
    ) -> (Orchestrator, Arc<Mutex<Vec<PathBuf>>>, Arc<SessionStore>) {
        let created = Arc::new(Mutex::new(Vec::new()));
        let fetcher = Arc::new(FileFetcher {
            dir: dir.path().to_path_buf(),
            created: created.clone(),
        });
        let store = Arc::new(SessionStore::new());
        let orchestrator =
            Orchestrator::with_components(Settings::default(), fetcher, transcriber, store.clone());
        (orchestrator, created, store)
    }

    const SPEECH: &str = "The quick brown fox jumps. The fox is quick. A dog sleeps.";

    #[tokio::test]
    async fn test_successful_run_publishes_transcript_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let (orchestrator, created, store) = orchestrator_with(
            &dir,
            Arc::new(FixedTranscriber {
                text: SPEECH.to_string(),
            }),
        );

        let result = orchestrator.analyze("s1", "https://youtu.be/abc").await.unwrap();

        assert_eq!(result.transcript.as_str(), SPEECH);
        assert_eq!(store.get("s1").unwrap().as_str(), SPEECH);
        assert!(!result.keywords.is_empty());

        // Three sentences with defaults asking for five: summary degrades to
        // its placeholder while the run still succeeds.
        assert_eq!(result.summary, "Not enough content to generate a summary.");

        for path in created.lock().unwrap().iter() {
            assert!(!path.exists(), "scratch file must be removed: {path:?}");
        }
    }

    #[tokio::test]
    async fn test_transcription_failure_cleans_up_and_preserves_session() {
        let dir = tempfile::tempdir().unwrap();
        let (orchestrator, created, store) =
            orchestrator_with(&dir, Arc::new(SilentTranscriber));

        let previous = Transcript::from_recognized_text("earlier talk").unwrap();
        store.put("s1", previous);

        let err = orchestrator.analyze("s1", "https://youtu.be/abc").await.unwrap_err();
        assert!(matches!(
            err,
            InnsiktError::Transcription(TranscriptionError::NoSpeechDetected)
        ));

        // The failed run left the prior transcript alone.
        assert_eq!(store.get("s1").unwrap().as_str(), "earlier talk");

        for path in created.lock().unwrap().iter() {
            assert!(!path.exists(), "scratch file must be removed: {path:?}");
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal_and_session_untouched() {
        let store = Arc::new(SessionStore::new());
        let orchestrator = Orchestrator::with_components(
            Settings::default(),
            Arc::new(FailingFetcher),
            Arc::new(FixedTranscriber {
                text: SPEECH.to_string(),
            }),
            store.clone(),
        );

        let err = orchestrator.analyze("s1", "https://youtu.be/gone").await.unwrap_err();
        assert!(matches!(err, InnsiktError::Fetch(FetchError::NotFound)));
        assert!(store.get("s1").is_none());
    }

    #[tokio::test]
    async fn test_blank_reference_rejected_before_fetch() {
        let store = Arc::new(SessionStore::new());
        let orchestrator = Orchestrator::with_components(
            Settings::default(),
            Arc::new(FailingFetcher),
            Arc::new(SilentTranscriber),
            store,
        );

        let err = orchestrator.analyze("s1", "   ").await.unwrap_err();
        assert!(matches!(err, InnsiktError::InvalidInput(_)));
    }
}
