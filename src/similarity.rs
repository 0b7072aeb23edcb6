//! Token-order-insensitive string similarity for company names.
//!
//! Casing and word order are the dominant sources of superficial variation
//! between duplicate company records ("Acme Corp" vs "CORP ACME"), so names
//! are lowercased, tokenized on whitespace, sorted, and rejoined before
//! comparison. The sorted keys are compared with Jaro-Winkler, scaled to the
//! 0-100 percent range used by the resolver threshold.

use strsim::jaro_winkler;

/// The canonical comparison form of a name: lowercased whitespace tokens,
/// sorted alphabetically, rejoined with single spaces.
pub fn token_sort_key(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Similarity of two pre-computed token-sort keys, in [0, 100].
pub fn key_ratio(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b) * 100.0
}

/// Token-sort similarity of two raw names, in [0, 100].
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    key_ratio(&token_sort_key(a), &token_sort_key(b))
}
