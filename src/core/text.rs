//! Keyword and similarity helpers shared by the builder, policy and evaluator

use std::collections::HashSet;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_WORD: Regex = Regex::new(r"\w+").unwrap();
}

/// Lowercased set of word tokens
pub fn word_set(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    RE_WORD
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Word-set Jaccard similarity in [0, 1]; two empty texts score 0
pub fn jaccard(a: &str, b: &str) -> f64 {
    let a = word_set(a);
    let b = word_set(b);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Any keyword occurs as a substring of the (already lowercased) text
pub fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lower.contains(k))
}

/// How many distinct keywords occur in the (already lowercased) text
pub fn count_present(lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| lower.contains(*k)).count()
}

/// Length in characters
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jaccard_identical() {
        assert_eq!(jaccard("How are you?", "how ARE you"), 1.0);
    }

    #[test]
    fn test_jaccard_disjoint_and_empty() {
        assert_eq!(jaccard("alpha beta", "gamma delta"), 0.0);
        assert_eq!(jaccard("", "?!"), 0.0);
    }

    #[test]
    fn test_jaccard_partial() {
        // {a, b, c} vs {b, c, d}: 2 / 4
        assert!((jaccard("a b c", "b c d") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_count_present_counts_each_keyword_once() {
        let text = "maybe, maybe, perhaps";
        assert_eq!(count_present(text, &["maybe", "perhaps", "probably"]), 2);
    }

    #[test]
    fn test_char_len_is_unicode_aware() {
        assert_eq!(char_len("café"), 4);
    }
}
