//! Heuristic metrics over prompt and response text.
//!
//! Length metrics are raw character counts; the others are bounded to [0, 1].

use std::collections::HashSet;

pub const PROMPT_LENGTH: &str = "prompt_length";
pub const RESPONSE_LENGTH: &str = "response_length";
pub const CLARITY: &str = "clarity";
pub const SPECIFICITY: &str = "specificity";
pub const SIMILARITY: &str = "similarity";

/// Metrics whose values always fall in [0, 1].
pub const BOUNDED_METRICS: &[&str] = &[CLARITY, SPECIFICITY, SIMILARITY];

const IDEAL_WORD_LENGTH: f64 = 6.5;
const WORD_LENGTH_SPREAD: f64 = 10.0;
/// Number of distinct specificity terms that earns a full score.
const SPECIFICITY_SATURATION: f64 = 3.0;

pub fn is_bounded(metric: &str) -> bool {
    BOUNDED_METRICS.contains(&metric)
}

/// Unicode scalar count.
pub fn char_length(text: &str) -> f64 {
    text.chars().count() as f64
}

/// Peaks when the mean word length is 6.5 characters and falls off linearly.
/// Empty text has a mean word length of 0, giving 0.35.
pub fn clarity(text: &str) -> f64 {
    let lengths: Vec<usize> = text.split_whitespace().map(|w| w.chars().count()).collect();
    let mean = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    };
    (1.0 - (mean - IDEAL_WORD_LENGTH).abs() / WORD_LENGTH_SPREAD).clamp(0.0, 1.0)
}

/// Fraction of the saturation count of specificity terms present as substrings.
pub fn specificity(text: &str, terms: &[String]) -> f64 {
    let lowered = text.to_lowercase();
    let count = terms
        .iter()
        .filter(|term| lowered.contains(&term.to_lowercase()))
        .count();
    (count as f64 / SPECIFICITY_SATURATION).min(1.0)
}

/// Jaccard index of the lowercased word sets; 0.0 when either side is empty.
pub fn similarity(text: &str, reference: &str) -> f64 {
    let lhs = text.to_lowercase();
    let rhs = reference.to_lowercase();
    let lhs_words: HashSet<&str> = lhs.split_whitespace().collect();
    let rhs_words: HashSet<&str> = rhs.split_whitespace().collect();

    if lhs_words.is_empty() || rhs_words.is_empty() {
        return 0.0;
    }

    let intersection = lhs_words.intersection(&rhs_words).count();
    let union = lhs_words.union(&rhs_words).count();
    intersection as f64 / union as f64
}
