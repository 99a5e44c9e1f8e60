//! Text normalization shared by the token resolvers
//!
//! - Removes diacritics
//! - Filters stop words
//! - Capitalizes words

use std::collections::HashSet;

use lazy_static::lazy_static;
use unicode_normalization::UnicodeNormalization;

/// Short function words skipped when picking title words (English + French).
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "of", "in", "on", "at", "to", "for", "with", "by", "and", "or", "but",
    "from", "into", "about", "as", "is", "was", "are", "were", "be", "been", "that", "this", "it",
    "its", "via", "de", "du", "des", "le", "la", "les", "un", "une",
];

lazy_static! {
    static ref STOP_WORD_SET: HashSet<&'static str> = STOP_WORDS.iter().copied().collect();
}

/// Decompose to NFD and drop combining diacritical marks (U+0300..U+036F).
///
/// Characters without a decomposition, such as `ß` or `ø`, pass through
/// unchanged.
pub fn strip_diacritics(s: &str) -> String {
    s.nfd()
        .filter(|c| !matches!(c, '\u{0300}'..='\u{036f}'))
        .collect()
}

/// Case-insensitive stop word check
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word.to_lowercase().as_str())
}

/// Uppercase the first character and lowercase the rest
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
    }
}
