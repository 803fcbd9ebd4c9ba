//! Text normalization for label matching
//!
//! Mentions, labels and recipe values are compared in one canonical form:
//! - Unicode NFKC fold
//! - Lowercase conversion
//! - Leading/trailing whitespace trimmed
//!
//! Interior punctuation and spacing are preserved, so exact-tier equality
//! stays exact.

use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Normalize text for matching.
///
/// # Examples
///
/// ```
/// use recipe_finder::entity_linking::normalize::normalize_text;
///
/// assert_eq!(normalize_text("  Red Onion "), "red onion");
/// assert_eq!(normalize_text("Ｏｎｉｏｎ"), "onion");
/// ```
pub fn normalize_text(s: &str) -> String {
    let folded: String = s.nfkc().collect();
    folded.trim().to_lowercase()
}

/// Split normalized text on whitespace.
pub fn tokenize(s: &str) -> Vec<String> {
    normalize_text(s)
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

/// Distinct whitespace tokens of `s`, for word-overlap matching
pub fn word_set(s: &str) -> HashSet<String> {
    tokenize(s).into_iter().collect()
}
