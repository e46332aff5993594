//! Frequency-ranked keyword extraction.

use super::{is_stopword, tokenize, Degradation};
use std::collections::HashMap;

/// Return the top `n` distinct content words by frequency.
///
/// Ties break by first occurrence in the text, so results are deterministic
/// and early-mentioned terms win.
pub fn extract_keywords(text: &str, n: usize) -> Result<Vec<String>, Degradation> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for (position, token) in tokenize(text).into_iter().enumerate() {
        if token.len() < 3 || is_stopword(&token) || token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        *counts.entry(token.clone()).or_insert(0) += 1;
        first_seen.entry(token).or_insert(position);
    }

    if counts.is_empty() || n == 0 {
        return Err(Degradation::NoKeywords);
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| first_seen[&a.0].cmp(&first_seen[&b.0]))
    });

    Ok(ranked.into_iter().take(n).map(|(word, _)| word).collect())
}
