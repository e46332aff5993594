//! Rule-based named entity extraction.
//!
//! Groups recognized entities by category into a mapping from category to
//! the distinct surface forms in order of first occurrence. Recognition is
//! pattern-based: dates, money, percentages, bare numbers, and multi-word
//! capitalized names or acronyms.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn recognizers() -> &'static [(&'static str, Regex)] {
    static RECOGNIZERS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    RECOGNIZERS.get_or_init(|| {
        vec![
            (
                "DATE",
                Regex::new(
                    r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:,\s*\d{4})?\b|\b(?:19|20)\d{2}\b",
                )
                .expect("invalid DATE pattern"),
            ),
            (
                "MONEY",
                Regex::new(r"\$\d[\d,]*(?:\.\d+)?(?:\s(?:thousand|million|billion|trillion))?")
                    .expect("invalid MONEY pattern"),
            ),
            (
                "PERCENT",
                Regex::new(r"\b\d+(?:\.\d+)?\s?(?:%|percent)").expect("invalid PERCENT pattern"),
            ),
            (
                "CARDINAL",
                Regex::new(r"\b\d[\d,]*(?:\.\d+)?\b").expect("invalid CARDINAL pattern"),
            ),
            (
                "NAME",
                // Multi-word capitalized sequences or acronyms. Single
                // capitalized words are skipped to avoid sentence starts.
                Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b|\b[A-Z][A-Z0-9]{2,}\b")
                    .expect("invalid NAME pattern"),
            ),
        ]
    })
}

/// Extract entities grouped by category.
///
/// Earlier categories claim their text spans, so a year matched as DATE is
/// not re-reported as CARDINAL and the digits of an amount stay inside MONEY.
pub fn extract_entities(text: &str) -> HashMap<String, Vec<String>> {
    let mut entities: HashMap<String, Vec<String>> = HashMap::new();
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    for (category, pattern) in recognizers() {
        for found in pattern.find_iter(text) {
            let span = (found.start(), found.end());
            if claimed.iter().any(|&(s, e)| span.0 < e && s < span.1) {
                continue;
            }
            claimed.push(span);

            let surface = found.as_str().to_string();
            let forms = entities.entry(category.to_string()).or_default();
            if !forms.contains(&surface) {
                forms.push(surface);
            }
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_by_category() {
        let text = "In 2021 Marie Curie Labs raised $5 million, growing 40% over 3 years.";
        let entities = extract_entities(text);

        assert_eq!(entities["DATE"], vec!["2021"]);
        assert_eq!(entities["MONEY"], vec!["$5 million"]);
        assert_eq!(entities["PERCENT"], vec!["40%"]);
        assert_eq!(entities["CARDINAL"], vec!["3"]);
        assert_eq!(entities["NAME"], vec!["Marie Curie Labs"]);
    }

    #[test]
    fn test_distinct_insertion_order() {
        let text = "NASA launched in 1958. NASA still flies. So does ESA.";
        let entities = extract_entities(text);
        assert_eq!(entities["NAME"], vec!["NASA", "ESA"]);
        assert_eq!(entities["DATE"], vec!["1958"]);
    }

    #[test]
    fn test_claimed_spans_are_not_reused() {
        let entities = extract_entities("It cost $1,200.50 exactly.");
        assert_eq!(entities["MONEY"], vec!["$1,200.50"]);
        assert!(!entities.contains_key("CARDINAL"));
    }

    #[test]
    fn test_plain_prose_yields_empty_map() {
        let entities = extract_entities("nothing notable was said here.");
        assert!(entities.is_empty());
    }
}
