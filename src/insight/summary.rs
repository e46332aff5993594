//! Extractive summarization by normalized term frequency.

use super::{is_stopword, split_sentences, tokenize, Degradation};
use std::collections::HashMap;

/// Select the `n` highest-scoring sentences of `text` as an extractive summary.
///
/// Each sentence scores the sum of its non-stopword tokens' normalized term
/// frequencies (frequency of the term divided by the maximum frequency in the
/// text). Selected sentences are re-ordered by original position so the
/// summary preserves narrative order, and appear verbatim.
pub fn summarize(text: &str, n: usize) -> Result<String, Degradation> {
    let sentences = split_sentences(text);
    if n == 0 || sentences.len() < n {
        return Err(Degradation::SummaryTooShort);
    }

    let mut frequencies: HashMap<String, f64> = HashMap::new();
    for token in tokenize(text) {
        if !is_stopword(&token) {
            *frequencies.entry(token).or_insert(0.0) += 1.0;
        }
    }
    if frequencies.is_empty() {
        return Err(Degradation::NoScorableTerms);
    }

    let max_frequency = frequencies.values().cloned().fold(0.0f64, f64::max);
    for value in frequencies.values_mut() {
        *value /= max_frequency;
    }

    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| {
            let score: f64 = tokenize(sentence)
                .iter()
                .filter_map(|token| frequencies.get(token))
                .sum();
            (index, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut selected: Vec<usize> = scored.into_iter().take(n).map(|(index, _)| index).collect();
    selected.sort_unstable();

    Ok(selected
        .into_iter()
        .map(|index| sentences[index].as_str())
        .collect::<Vec<_>>()
        .join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_highest_scoring_sentence_verbatim() {
        let text = "The quick brown fox jumps. The fox is quick. A dog sleeps.";
        let summary = summarize(text, 1).unwrap();
        assert_eq!(summary, "The quick brown fox jumps.");
    }

    #[test]
    fn test_selected_sentences_keep_original_order() {
        // The last sentence scores highest, but must come after the first
        // high scorer in the output.
        let text = "Rust compilers optimize code. Birds exist. Rust compilers rewrite code fast.";
        let summary = summarize(text, 2).unwrap();
        assert_eq!(
            summary,
            "Rust compilers optimize code. Rust compilers rewrite code fast."
        );
    }

    #[test]
    fn test_too_few_sentences_degrades() {
        let text = "Only one sentence here.";
        assert_eq!(summarize(text, 5), Err(Degradation::SummaryTooShort));
    }

    #[test]
    fn test_stopword_only_text_degrades() {
        let text = "It is. They were. We are. The those. This that. A an.";
        assert_eq!(summarize(text, 2), Err(Degradation::NoScorableTerms));
    }
}
