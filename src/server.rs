//! HTTP shell around the analysis pipeline and knowledge queries.
//!
//! The core is session-keyed; here a `sid` cookie carries the session
//! identity across requests, minted on first contact. Handlers surface plain
//! error messages only: no internal detail, no credential material.

use crate::config::{Prompts, Settings};
use crate::error::InnsiktError;
use crate::orchestrator::Orchestrator;
use crate::query::{QueryEngine, QuizQuestion};
use crate::session::SessionStore;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};
use uuid::Uuid;

const NO_TRANSCRIPT: &str = "No transcript found in session.";

/// Shared application state.
pub struct AppState {
    orchestrator: Orchestrator,
    engine: QueryEngine,
    store: Arc<SessionStore>,
}

impl AppState {
    /// Build state with default components from settings.
    pub fn new(settings: Settings) -> crate::error::Result<Self> {
        let store = Arc::new(SessionStore::new());
        let prompts = Prompts::load(settings.general.prompts_dir.as_deref())?;
        let engine = QueryEngine::new(settings.query.clone(), prompts);
        let orchestrator = Orchestrator::new(settings, store.clone());
        Ok(Self {
            orchestrator,
            engine,
            store,
        })
    }

    /// Build state around a pre-assembled orchestrator and engine.
    pub fn with_components(orchestrator: Orchestrator, engine: QueryEngine) -> Self {
        let store = orchestrator.store();
        Self {
            orchestrator,
            engine,
            store,
        }
    }
}

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/quiz", get(quiz_state))
        .route("/generate_questions", post(generate_questions))
        .route("/ask", post(ask))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> crate::error::Result<()> {
    let state = Arc::new(AppState::new(settings)?);
    let router = app(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}

// === Request/Response Types ===

/// Absent fields deserialize as `None` so a missing `youtube_url` gets the
/// same 400 `{error}` response as a blank one, instead of an extractor
/// rejection.
#[derive(Deserialize)]
struct AnalyzeRequest {
    youtube_url: Option<String>,
}

#[derive(Deserialize)]
struct AskRequest {
    question: Option<String>,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
}

#[derive(Serialize)]
struct QuizStateResponse {
    ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Session cookie handling ===

/// Read the session id from the `sid` cookie, minting a fresh one if absent.
/// Returns the id and whether it was newly minted.
fn session_id(headers: &HeaderMap) -> (String, bool) {
    let existing = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(str::trim)
                .find_map(|pair| pair.strip_prefix("sid="))
        })
        .filter(|sid| !sid.is_empty())
        .map(str::to_string);

    match existing {
        Some(sid) => (sid, false),
        None => (Uuid::new_v4().to_string(), true),
    }
}

/// Attach a Set-Cookie header when the session id was newly minted.
fn with_session_cookie(mut response: Response, sid: &str, minted: bool) -> Response {
    if minted {
        if let Ok(value) = HeaderValue::from_str(&format!("sid={sid}; Path=/; HttpOnly")) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    let (sid, minted) = session_id(&headers);

    let youtube_url = req.youtube_url.as_deref().unwrap_or_default();
    if youtube_url.trim().is_empty() {
        let response = error_response(StatusCode::BAD_REQUEST, "Please enter a YouTube URL.");
        return with_session_cookie(response, &sid, minted);
    }

    let response = match state.orchestrator.analyze(&sid, youtube_url).await {
        Ok(result) => Json(result).into_response(),
        Err(InnsiktError::InvalidInput(message)) => {
            error_response(StatusCode::BAD_REQUEST, message)
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    with_session_cookie(response, &sid, minted)
}

async fn quiz_state(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (sid, minted) = session_id(&headers);

    // Page-level readiness, not an HTTP error: the quiz page renders its own
    // message when no transcript has been captured yet.
    let body = match state.store.get(&sid) {
        Some(_) => QuizStateResponse {
            ready: true,
            error: None,
        },
        None => QuizStateResponse {
            ready: false,
            error: Some(format!("{NO_TRANSCRIPT} Analyze a video first.")),
        },
    };

    with_session_cookie(Json(body).into_response(), &sid, minted)
}

async fn generate_questions(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (sid, minted) = session_id(&headers);

    let Some(transcript) = state.store.get(&sid) else {
        let response = error_response(StatusCode::BAD_REQUEST, NO_TRANSCRIPT);
        return with_session_cookie(response, &sid, minted);
    };

    let response = match state.engine.generate_quiz(&transcript).await {
        Ok(quiz) => Json::<Vec<QuizQuestion>>(quiz).into_response(),
        Err(e) => {
            if let crate::error::QueryError::MalformedResponse(raw) = &e {
                debug!("Malformed quiz payload: {raw}");
            }
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    };
    with_session_cookie(response, &sid, minted)
}

async fn ask(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AskRequest>,
) -> Response {
    let (sid, minted) = session_id(&headers);

    let Some(transcript) = state.store.get(&sid) else {
        let response = error_response(StatusCode::BAD_REQUEST, NO_TRANSCRIPT);
        return with_session_cookie(response, &sid, minted);
    };

    let question = req.question.as_deref().unwrap_or_default();
    if question.trim().is_empty() {
        let response = error_response(StatusCode::BAD_REQUEST, "Please enter a question.");
        return with_session_cookie(response, &sid, minted);
    }

    let response = match state.engine.answer_question(&transcript, question).await {
        Ok(answer) => Json(AskResponse { answer }).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    with_session_cookie(response, &sid, minted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuerySettings;
    use crate::error::{FetchError, TranscriptionError};
    use crate::fetch::{AudioAsset, AudioFetcher};
    use crate::transcription::{Transcriber, Transcript};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    struct ScratchFetcher {
        dir: std::path::PathBuf,
    }

    #[async_trait]
    impl AudioFetcher for ScratchFetcher {
        async fn fetch(&self, _video_ref: &str) -> Result<AudioAsset, FetchError> {
            let id = Uuid::new_v4();
            let path = self.dir.join(format!("audio_{}.mp3", id));
            std::fs::write(&path, b"fake audio")
                .map_err(|e| FetchError::ExternalFailure(e.to_string()))?;
            Ok(AudioAsset::new(path, id))
        }
    }

    struct FixedTranscriber;

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(
            &self,
            _asset: &AudioAsset,
        ) -> Result<Transcript, TranscriptionError> {
            Transcript::from_recognized_text("The quick brown fox jumps. The fox is quick.")
        }
    }

    fn test_app(dir: &tempfile::TempDir) -> (Router, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::new());
        let orchestrator = Orchestrator::with_components(
            Settings::default(),
            Arc::new(ScratchFetcher {
                dir: dir.path().to_path_buf(),
            }),
            Arc::new(FixedTranscriber),
            store.clone(),
        );
        let engine = QueryEngine::new(QuerySettings::default(), Prompts::default());
        let state = Arc::new(AppState::with_components(orchestrator, engine));
        (app(state), store)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ask_without_transcript_is_rejected_before_external_call() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _store) = test_app(&dir);

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question": "What is discussed?"}"#))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "No transcript found in session.");
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (router, store) = test_app(&dir);
        store.put(
            "sid-1",
            Transcript::from_recognized_text("some talk").unwrap(),
        );

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .header("cookie", "sid=sid-1")
            .body(Body::from(r#"{"question": "   "}"#))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Please enter a question.");
    }

    #[tokio::test]
    async fn test_analyze_missing_url_field_is_rejected_with_error_shape() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _store) = test_app(&dir);

        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Please enter a YouTube URL.");
    }

    #[tokio::test]
    async fn test_ask_missing_question_field_is_rejected_with_error_shape() {
        let dir = tempfile::tempdir().unwrap();
        let (router, store) = test_app(&dir);
        store.put(
            "sid-3",
            Transcript::from_recognized_text("some talk").unwrap(),
        );

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .header("cookie", "sid=sid-3")
            .body(Body::from("{}"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Please enter a question.");
    }

    #[tokio::test]
    async fn test_analyze_blank_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _store) = test_app(&dir);

        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"youtube_url": ""}"#))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Please enter a YouTube URL.");
    }

    #[tokio::test]
    async fn test_analyze_publishes_transcript_and_mints_cookie() {
        let dir = tempfile::tempdir().unwrap();
        let (router, store) = test_app(&dir);

        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"youtube_url": "https://youtu.be/abc"}"#))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("fresh session must set a cookie")
            .to_str()
            .unwrap()
            .to_string();
        let sid = cookie
            .strip_prefix("sid=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(
            body["transcript"],
            "The quick brown fox jumps. The fox is quick."
        );

        assert!(store.get(sid).is_some());
    }

    #[tokio::test]
    async fn test_quiz_state_reflects_session() {
        let dir = tempfile::tempdir().unwrap();
        let (router, store) = test_app(&dir);
        store.put(
            "sid-2",
            Transcript::from_recognized_text("some talk").unwrap(),
        );

        let request = Request::builder()
            .method("GET")
            .uri("/quiz")
            .header("cookie", "sid=sid-2")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ready"], true);

        let request = Request::builder()
            .method("GET")
            .uri("/quiz")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ready"], false);
        assert!(body["error"].as_str().unwrap().contains("No transcript"));
    }

    #[tokio::test]
    async fn test_generate_questions_without_transcript_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _store) = test_app(&dir);

        let request = Request::builder()
            .method("POST")
            .uri("/generate_questions")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "No transcript found in session."
        );
    }

    #[test]
    fn test_session_id_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sid=abc-123; lang=en"),
        );
        assert_eq!(session_id(&headers), ("abc-123".to_string(), false));

        let (sid, minted) = session_id(&HeaderMap::new());
        assert!(minted);
        assert!(!sid.is_empty());
    }
}
