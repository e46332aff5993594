//! Knowledge queries against a stored transcript.
//!
//! Builds bounded prompts from the session transcript and asks a language
//! model either to generate a quiz or to answer a free-form question.
//! Structured responses are validated field by field, never trusted.

use crate::config::{Prompts, QuerySettings};
use crate::error::QueryError;
use crate::openai::{create_client_with_timeout, is_api_key_configured};
use crate::transcription::Transcript;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Required number of options per quiz question.
pub const QUIZ_OPTION_COUNT: usize = 4;

/// One validated multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Quiz generation and question answering over one transcript.
///
/// Stateless with respect to question history: every call stands alone.
pub struct QueryEngine {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    settings: QuerySettings,
    prompts: Prompts,
}

impl QueryEngine {
    /// Create an engine with an explicit per-call deadline from settings.
    pub fn new(settings: QuerySettings, prompts: Prompts) -> Self {
        let client = create_client_with_timeout(Duration::from_secs(settings.timeout_seconds));
        Self {
            client,
            settings,
            prompts,
        }
    }

    /// Generate a multiple-choice quiz from the transcript.
    #[instrument(skip(self, transcript))]
    pub async fn generate_quiz(
        &self,
        transcript: &Transcript,
    ) -> Result<Vec<QuizQuestion>, QueryError> {
        if !is_api_key_configured() {
            return Err(QueryError::MissingCredential);
        }

        let excerpt = truncate_to_chars(transcript.as_str(), self.settings.max_transcript_chars);

        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), excerpt.to_string());
        vars.insert("count".to_string(), self.settings.quiz_questions.to_string());
        let user_prompt = Prompts::render(&self.prompts.quiz.user, &vars);

        let raw = self.complete(&self.prompts.quiz.system, &user_prompt).await?;
        let quiz = parse_quiz(&raw, self.settings.quiz_questions)?;

        info!("Generated quiz with {} questions", quiz.len());
        Ok(quiz)
    }

    /// Answer a free-form question against the transcript.
    #[instrument(skip(self, transcript), fields(question = %question))]
    pub async fn answer_question(
        &self,
        transcript: &Transcript,
        question: &str,
    ) -> Result<String, QueryError> {
        if !is_api_key_configured() {
            return Err(QueryError::MissingCredential);
        }

        let excerpt = truncate_to_chars(transcript.as_str(), self.settings.max_transcript_chars);

        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), excerpt.to_string());
        vars.insert("question".to_string(), question.to_string());
        let user_prompt = Prompts::render(&self.prompts.qa.user, &vars);

        let raw = self.complete(&self.prompts.qa.system, &user_prompt).await?;
        let answer = raw.trim();
        if answer.is_empty() {
            return Err(QueryError::MalformedResponse(raw));
        }

        debug!("Answered with {} characters", answer.len());
        Ok(answer.to_string())
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, QueryError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(map_openai_error)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user.to_string())
                .build()
                .map_err(map_openai_error)?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.model)
            .messages(messages)
            .temperature(0.7)
            .build()
            .map_err(map_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| QueryError::MalformedResponse(String::new()))?;

        Ok(content.clone())
    }
}

fn map_openai_error(e: OpenAIError) -> QueryError {
    match e {
        OpenAIError::ApiError(api) => QueryError::ExternalUnavailable(api.message),
        other => QueryError::ExternalUnavailable(other.to_string()),
    }
}

/// Truncate to at most `max_chars` characters, keeping the prefix.
///
/// Only the start of a long transcript is eligible for quiz questions and
/// answers; this keeps the prompt inside the model's input budget.
fn truncate_to_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Strip optional markdown code fences around a JSON payload.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse and validate a quiz payload.
///
/// Every element must carry all three fields, exactly four distinct options,
/// and an answer that is one of its options; the quiz must have exactly
/// `expected_len` questions. Any violation rejects the whole payload.
fn parse_quiz(raw: &str, expected_len: usize) -> Result<Vec<QuizQuestion>, QueryError> {
    let body = strip_code_fences(raw);

    let quiz: Vec<QuizQuestion> =
        serde_json::from_str(body).map_err(|_| QueryError::MalformedResponse(raw.to_string()))?;

    if quiz.len() != expected_len {
        return Err(QueryError::MalformedResponse(raw.to_string()));
    }

    for question in &quiz {
        if question.question.trim().is_empty() {
            return Err(QueryError::MalformedResponse(raw.to_string()));
        }
        if question.options.len() != QUIZ_OPTION_COUNT {
            return Err(QueryError::MalformedResponse(raw.to_string()));
        }
        let distinct: HashSet<&str> = question.options.iter().map(String::as_str).collect();
        if distinct.len() != QUIZ_OPTION_COUNT {
            return Err(QueryError::MalformedResponse(raw.to_string()));
        }
        if !question.options.contains(&question.answer) {
            return Err(QueryError::MalformedResponse(raw.to_string()));
        }
    }

    Ok(quiz)
}
