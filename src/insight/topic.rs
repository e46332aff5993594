//! Single-document topic extraction.
//!
//! Builds a bag-of-words model over stemmed, stopword-filtered tokens and
//! surfaces the highest-weighted terms as human-readable topic phrases.

use super::{is_stopword, stem, tokenize, Degradation};
use std::collections::HashMap;

/// Extract up to `num_topics` topic phrases with `num_terms` terms each.
///
/// Tokens shorter than 4 characters and stopwords are dropped before the
/// model is fit. Fewer than `min_tokens` remaining tokens is treated as not
/// enough content rather than fitting a degenerate model. Terms are assigned
/// to topics round-robin by descending weight, so each phrase reads as a
/// distinct slice of the document's vocabulary.
pub fn extract_topics(
    text: &str,
    num_topics: usize,
    num_terms: usize,
    min_tokens: usize,
) -> Result<Vec<String>, Degradation> {
    let tokens: Vec<String> = tokenize(text)
        .into_iter()
        .filter(|t| t.len() > 3 && !is_stopword(t))
        .map(|t| stem(&t))
        .collect();

    if num_topics == 0 || tokens.len() < min_tokens {
        return Err(Degradation::NotEnoughContent);
    }

    let mut weights: HashMap<String, usize> = HashMap::new();
    for token in tokens {
        *weights.entry(token).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = weights.into_iter().collect();
    // Weight descending, then alphabetical for a deterministic ordering.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut topics = Vec::with_capacity(num_topics);
    for topic_index in 0..num_topics {
        let terms: Vec<&str> = ranked
            .iter()
            .skip(topic_index)
            .step_by(num_topics)
            .take(num_terms)
            .map(|(term, _)| term.as_str())
            .collect();

        if terms.is_empty() {
            break;
        }
        topics.push(format!("Topic {}: {}", topic_index + 1, terms.join(", ")));
    }

    if topics.is_empty() {
        return Err(Degradation::NotEnoughContent);
    }
    Ok(topics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_degrades() {
        let result = extract_topics("too short to model", 3, 5, 20);
        assert_eq!(result, Err(Degradation::NotEnoughContent));
    }

    #[test]
    fn test_top_terms_surface_first() {
        let text = "kernel kernel kernel scheduler scheduler memory memory memory memory \
                    driver driver interrupt interrupt interrupt interrupt process process \
                    thread thread thread socket socket buffer";
        let topics = extract_topics(text, 1, 3, 20).unwrap();
        assert_eq!(topics.len(), 1);
        // "interrupt" and "memory" both occur 4 times; alphabetical tie-break.
        assert_eq!(topics[0], "Topic 1: interrupt, memory, kernel");
    }

    #[test]
    fn test_topic_count_and_shape() {
        let words: Vec<String> = (0..30).map(|i| format!("concept{:02} ", i)).collect();
        let text = words.concat();
        let topics = extract_topics(&text, 3, 5, 20).unwrap();
        assert_eq!(topics.len(), 3);
        assert!(topics[0].starts_with("Topic 1: "));
        assert!(topics[2].starts_with("Topic 3: "));
    }
}
