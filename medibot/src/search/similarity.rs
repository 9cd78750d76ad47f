//! Token-set similarity used to recognise repeat questions.
//!
//! Both strings are split on whitespace into sets of tokens and scored by
//! Jaccard overlap, `|A ∩ B| / |A ∪ B|`. No casing, punctuation or Unicode
//! normalization is applied, so `"두통이"` and `"두통이?"` are different tokens.

use std::collections::HashSet;

use crate::models::QaPair;

fn token_set(text: &str) -> HashSet<&str> {
    text.split_whitespace().collect()
}

/// Jaccard overlap of the whitespace token sets of `a` and `b`.
///
/// Returns `0.0` when both sides have no tokens.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_tokens = token_set(a);
    let b_tokens = token_set(b);

    let union = a_tokens.union(&b_tokens).count();
    if union == 0 {
        return 0.0;
    }

    let common = a_tokens.intersection(&b_tokens).count();
    common as f64 / union as f64
}

/// Return the first pair whose question scores strictly above `threshold`.
///
/// Pairs are checked in iteration order and the scan stops at the first
/// match; callers pass them in ascending id order so the earliest stored
/// question wins ties.
pub fn find_similar<'a, I>(question: &str, pairs: I, threshold: f64) -> Option<&'a QaPair>
where
    I: IntoIterator<Item = &'a QaPair>,
{
    pairs
        .into_iter()
        .find(|pair| similarity(question, &pair.question) > threshold)
}
