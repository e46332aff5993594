//! Prompt templates for Innsikt.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub quiz: QuizPrompts,
    pub qa: QaPrompts,
}

/// Prompts for quiz generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizPrompts {
    pub system: String,
    pub user: String,
}

impl Default for QuizPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a quiz author. You write multiple-choice questions that test comprehension of a video transcript.

Rules:
- Every question must be answerable from the transcript alone
- Each question has exactly 4 distinct answer options
- Exactly one option is correct, and it must be copied verbatim into the "answer" field
- Respond with raw JSON only: no prose, no markdown code fences"#
                .to_string(),

            user: r#"Based on the following transcript, generate exactly {{count}} multiple-choice questions.

Transcript:
{{transcript}}

Respond with a JSON array of {{count}} objects. Each object has:
- "question": The question text
- "options": An array of exactly 4 distinct answer options
- "answer": The correct option, copied exactly from "options"

Example:
[
  {"question": "What is discussed first?", "options": ["Budgets", "Hiring", "Roadmaps", "Metrics"], "answer": "Roadmaps"}
]"#
                .to_string(),
        }
    }
}

/// Prompts for transcript question answering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    pub system: String,
    pub user: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful assistant that answers questions about a video using only its transcript.

Guidelines:
- Answer using only the provided transcript
- If the transcript does not contain the answer, say so clearly
- Be concise but complete"#
                .to_string(),

            user: r#"Transcript:
{{transcript}}

Question: {{question}}

Answer the question based only on the transcript above."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from defaults, with optional custom directory overrides.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let quiz_path = custom_path.join("quiz.toml");
            if quiz_path.exists() {
                let content = std::fs::read_to_string(&quiz_path)?;
                prompts.quiz = toml::from_str(&content)?;
            }

            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}
