//! Insight extractors.
//!
//! Independent analyses over a transcript: extractive summary, topic terms,
//! keywords and named entities. Each extractor is a pure function of the
//! transcript text. Extractor failures are soft: they degrade a single field
//! of the analysis result instead of aborting the pipeline run.

mod entities;
mod keywords;
mod summary;
mod topic;

pub use entities::extract_entities;
pub use keywords::extract_keywords;
pub use summary::summarize;
pub use topic::extract_topics;

use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

/// Soft failure of a single insight extractor.
///
/// The Display form is the explanatory placeholder published in place of the
/// affected field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    #[error("Not enough content to generate a summary.")]
    SummaryTooShort,

    #[error("Could not determine word frequencies for summary.")]
    NoScorableTerms,

    #[error("Not enough content for topic modeling.")]
    NotEnoughContent,

    #[error("No keywords found.")]
    NoKeywords,
}

/// Split text into sentences, keeping each sentence's original form
/// including its terminator.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut prev_end = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let mut end = i + c.len_utf8();
            // Consume runs of terminators ("?!", "...") as one boundary.
            while let Some(&(j, c2)) = chars.peek() {
                if matches!(c2, '.' | '!' | '?') {
                    end = j + c2.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let sentence = text[prev_end..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            prev_end = end;
        }
    }

    let tail = text[prev_end..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

/// Lowercased word tokens, punctuation stripped.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|t| t.trim_matches('\'').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Very light stemmer for topic terms: trailing -ing / -ed / plural -s.
pub(crate) fn stem(token: &str) -> String {
    if let Some(base) = token.strip_suffix("ing") {
        if base.len() > 3 {
            return undouble(base);
        }
    }
    if let Some(base) = token.strip_suffix("ed") {
        if base.len() > 3 {
            return undouble(base);
        }
    }
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

/// Collapse the doubled consonant left behind by suffix stripping
/// ("runn" -> "run"). Vowels and 's' stay doubled.
fn undouble(base: &str) -> String {
    let bytes = base.as_bytes();
    if let [.., prev, last] = bytes {
        if last == prev
            && last.is_ascii_alphabetic()
            && !matches!(last, b'a' | b'e' | b'i' | b'o' | b'u' | b's')
        {
            return base[..base.len() - 1].to_string();
        }
    }
    base.to_string()
}

pub(crate) fn is_stopword(token: &str) -> bool {
    static STOPWORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOPWORDS
        .get_or_init(|| {
            [
                "a", "about", "above", "after", "again", "against", "all", "also", "am", "an",
                "and", "any", "are", "as", "at", "be", "because", "been", "before", "being",
                "below", "between", "both", "but", "by", "can", "cannot", "could", "did", "do",
                "does", "doing", "down", "during", "each", "few", "for", "from", "further",
                "get", "got", "had", "has", "have", "having", "he", "her", "here", "hers",
                "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself",
                "just", "like", "me", "more", "most", "my", "myself", "no", "nor", "not",
                "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out",
                "over", "own", "really", "same", "she", "should", "so", "some", "such", "than",
                "that", "the", "their", "theirs", "them", "then", "there", "these", "they",
                "this", "those", "through", "to", "too", "under", "until", "up", "very", "was",
                "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
                "will", "with", "would", "you", "your", "yours",
            ]
            .into_iter()
            .collect()
        })
        .contains(token)
}
