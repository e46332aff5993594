//! Configuration module for Innsikt.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts, QuizPrompts};
pub use settings::{
    AnalysisSettings, GeneralSettings, QuerySettings, ServerSettings, Settings,
    TranscriptionSettings,
};
